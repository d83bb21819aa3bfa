//! Core types and shared functionality for ddicheck.
//!
//! This crate provides:
//! - The interaction data model (records, per-drug results, batches)
//! - Drug list parsing
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod drugs;
pub mod error;
pub mod model;

pub use config::{AppConfig, ConfigError, Markers};
pub use drugs::parse_drug_list;
pub use error::Error;
pub use model::{
    DrugLookupResult, Extraction, FailureReason, InteractionRecord, InteractionSet, LookupBatch, LookupEntry,
    TransportFailure, UNKNOWN_SEVERITY,
};
