//! Client code for ddicheck.
//!
//! This crate provides the lookup pipeline shared by the server and CLI:
//! fetching interaction pages, extracting interaction records, running a
//! batch of lookups, and rendering the result.

pub mod check;
pub mod extract;
pub mod fetch;
pub mod report;

pub use check::{Checker, Session};
pub use extract::{Extractor, InteractionExtractor};
pub use fetch::{DocumentBody, FetchConfig, Fetcher, HttpFetcher};
pub use report::{render_json, render_report, to_json_pretty};
