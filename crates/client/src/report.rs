//! Text and JSON rendering of a lookup batch.
//!
//! Text format:
//! ```text
//! ### Interaction Results
//! _Checked at <ISO8601 timestamp>_
//!
//! **Interactions for <drug>:**
//! - **<title>**: <detail> (Severity: <severity>)
//! ```

use chrono::SecondsFormat;
use ddicheck_core::{DrugLookupResult, FailureReason, LookupBatch};
use serde::Serialize;
use std::fmt::Write;

/// Render a batch as the text shown to a user.
pub fn render_report(batch: &LookupBatch) -> String {
    let mut out = String::from("### Interaction Results\n");

    if batch.is_empty() {
        out.push_str("No interactions found.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "_Checked at {}_",
        batch.checked_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    for entry in batch.entries() {
        let _ = writeln!(out, "\n**Interactions for {}:**", entry.drug);

        match &entry.result {
            DrugLookupResult::Interactions(set) if set.is_empty() => {
                out.push_str("No interaction records could be read for this medication.\n");
            }
            DrugLookupResult::Interactions(set) => {
                for record in set {
                    let _ = writeln!(
                        out,
                        "- **{}**: {} (Severity: {})",
                        record.title(),
                        record.detail(),
                        record.severity()
                    );
                }
            }
            DrugLookupResult::Failure(reason @ FailureReason::Unexpected(_)) => {
                let _ = writeln!(out, "error: {}", reason);
            }
            DrugLookupResult::Failure(reason) => {
                let _ = writeln!(out, "{}", reason);
            }
        }

        for warning in &entry.warnings {
            let _ = writeln!(out, "warning: {}", warning);
        }
    }

    out
}

/// Render a batch as pretty-printed JSON.
pub fn render_json(batch: &LookupBatch) -> String {
    to_json_pretty(batch)
}

/// Pretty-print any serializable value, logging and returning an empty
/// string if serialization fails.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::error!("failed to serialize output as JSON: {}", e);
        String::new()
    })
}
