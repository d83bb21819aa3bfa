//! Interaction records and the per-drug record set.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Severity used when an entry carries no severity marker.
pub const UNKNOWN_SEVERITY: &str = "unknown severity";

/// One interaction between the queried drug and another substance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InteractionRecord {
    title: String,
    detail: String,
    severity: String,
}

impl InteractionRecord {
    /// Build a record from raw element text.
    ///
    /// Title, detail and severity are trimmed. A missing severity becomes
    /// [`UNKNOWN_SEVERITY`]. Callers skip entries whose title is blank; the
    /// title is the key of [`InteractionSet`].
    pub fn new(title: &str, detail: &str, severity: Option<&str>) -> Self {
        Self {
            title: title.trim().to_string(),
            detail: detail.trim().to_string(),
            severity: severity.map_or_else(|| UNKNOWN_SEVERITY.to_string(), |s| s.trim().to_string()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn severity(&self) -> &str {
        &self.severity
    }
}

/// Ordered set of records keyed by title.
///
/// Inserting a record whose title is already present replaces the earlier
/// record in place, so the set keeps first-occurrence order of titles while
/// the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct InteractionSet {
    records: Vec<InteractionRecord>,
}

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same title.
    ///
    /// Returns the replaced record, if any.
    pub fn insert(&mut self, record: InteractionRecord) -> Option<InteractionRecord> {
        match self.records.iter_mut().find(|r| r.title == record.title) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&InteractionRecord> {
        self.records.iter().find(|r| r.title == title)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InteractionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<InteractionRecord> for InteractionSet {
    fn from_iter<I: IntoIterator<Item = InteractionRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a InteractionSet {
    type Item = &'a InteractionRecord;
    type IntoIter = std::slice::Iter<'a, InteractionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// Routed through insert so duplicate titles collapse on the way in too.
impl<'de> Deserialize<'de> for InteractionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<InteractionRecord>::deserialize(deserializer).map(|records| records.into_iter().collect())
    }
}
