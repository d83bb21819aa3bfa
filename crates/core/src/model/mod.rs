//! Interaction data model.
//!
//! - [`InteractionRecord`]: one interaction reported for a drug.
//! - [`InteractionSet`]: records for one drug, keyed by title.
//! - [`DrugLookupResult`]: either interactions or a typed failure.
//! - [`LookupBatch`]: results for every drug in one check, in input order.

pub mod batch;
pub mod lookup;
pub mod record;

pub use batch::{LookupBatch, LookupEntry};
pub use lookup::{DrugLookupResult, Extraction, FailureReason, TransportFailure};
pub use record::{InteractionRecord, InteractionSet, UNKNOWN_SEVERITY};
