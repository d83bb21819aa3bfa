//! Results of one check action.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::lookup::DrugLookupResult;

/// Lookup result for one drug, with the warnings raised while extracting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LookupEntry {
    /// Drug identifier as typed, trimmed.
    pub drug: String,
    pub result: DrugLookupResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Per-drug results produced by one check, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LookupBatch {
    /// When the check was run.
    pub checked_at: DateTime<Utc>,
    entries: Vec<LookupEntry>,
}

impl LookupBatch {
    pub fn new() -> Self {
        Self { checked_at: Utc::now(), entries: Vec::new() }
    }

    /// Record the result for a drug.
    ///
    /// A drug that is already present keeps its position and has its result
    /// and warnings replaced.
    pub fn insert(&mut self, drug: impl Into<String>, result: DrugLookupResult, warnings: Vec<String>) {
        let drug = drug.into();
        match self.entries.iter_mut().find(|e| e.drug == drug) {
            Some(entry) => {
                entry.result = result;
                entry.warnings = warnings;
            }
            None => self.entries.push(LookupEntry { drug, result, warnings }),
        }
    }

    pub fn get(&self, drug: &str) -> Option<&LookupEntry> {
        self.entries.iter().find(|e| e.drug == drug)
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.drug.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of interaction records across all drugs.
    pub fn interaction_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.result.interactions())
            .map(|set| set.len())
            .sum()
    }
}

impl Default for LookupBatch {
    fn default() -> Self {
        Self::new()
    }
}
