//! Per-drug lookup outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::record::InteractionSet;

/// Why fetching a drug's interaction page failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportFailure {
    /// The server answered with anything other than 200.
    #[error("Failed to retrieve data (Status code: {code}).")]
    Status { code: u16 },

    /// DNS, connect, timeout or body read error.
    #[error("Failed to retrieve data ({message}).")]
    Network { message: String },

    /// The body exceeded the configured byte limit.
    #[error("Failed to retrieve data (response of {size} bytes exceeds {limit}).")]
    TooLarge { size: u64, limit: u64 },
}

impl TransportFailure {
    /// The HTTP status code, when the failure came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code } => Some(*code),
            _ => None,
        }
    }
}

/// Typed failure for a single drug lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, thiserror::Error)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The page has no interactions section.
    #[error("No interactions section found for this medication.")]
    NoSection,

    /// The interactions section holds no entries.
    #[error("No interaction details found.")]
    NoEntries,

    #[error("{0}")]
    TransportError(TransportFailure),

    /// The document body could not be turned into a tree.
    #[error("Could not parse the interaction page: {0}")]
    ParseError(String),

    /// A fault nothing else classifies, such as a panicked lookup task.
    #[error("Error during scraping: {0}")]
    Unexpected(String),
}

impl From<TransportFailure> for FailureReason {
    fn from(failure: TransportFailure) -> Self {
        FailureReason::TransportError(failure)
    }
}

/// Outcome of looking up one drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum DrugLookupResult {
    /// Extraction succeeded. The set may be empty when every entry was malformed.
    Interactions(InteractionSet),
    Failure(FailureReason),
}

impl DrugLookupResult {
    pub fn interactions(&self) -> Option<&InteractionSet> {
        match self {
            Self::Interactions(set) => Some(set),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Interactions(_) => None,
            Self::Failure(reason) => Some(reason),
        }
    }

    /// True for a successful extraction that produced no records.
    ///
    /// This is distinct from `Failure(NoEntries)`: entries were found but none
    /// had both a title and a detail.
    pub fn is_empty_interactions(&self) -> bool {
        matches!(self, Self::Interactions(set) if set.is_empty())
    }
}

impl From<FailureReason> for DrugLookupResult {
    fn from(reason: FailureReason) -> Self {
        DrugLookupResult::Failure(reason)
    }
}

impl From<TransportFailure> for DrugLookupResult {
    fn from(failure: TransportFailure) -> Self {
        DrugLookupResult::Failure(failure.into())
    }
}

/// Result of running the extractor over one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Extraction {
    pub result: DrugLookupResult,
    /// Non-fatal warnings, one per skipped entry.
    pub warnings: Vec<String>,
}

impl Extraction {
    /// An extraction that failed before any entry was inspected.
    pub fn failed(reason: FailureReason) -> Self {
        Self { result: DrugLookupResult::Failure(reason), warnings: Vec::new() }
    }
}
