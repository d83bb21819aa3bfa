//! MCP tool implementations.
//!
//! This module contains all tools exposed by the ddicheck server.

pub mod check_interactions;
pub mod extract_interactions;
