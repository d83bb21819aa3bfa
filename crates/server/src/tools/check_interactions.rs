//! check_interactions tool implementation.
//!
//! Fetches the lookup page for every drug and extracts its interactions.

use ddicheck_client::{Checker, render_report, to_json_pretty};
use ddicheck_core::{Error, LookupBatch, parse_drug_list};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for check_interactions tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CheckInteractionsParams {
    /// Comma-separated medication names, e.g. "warfarin, aspirin".
    pub drugs: String,

    /// Also return the human-readable text report.
    #[serde(default)]
    pub include_report: bool,
}

/// Output structure for check_interactions tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CheckInteractionsOutput {
    /// Per-drug results in input order.
    pub batch: LookupBatch,
    /// Text report (if include_report=true).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

/// Implementation of the check_interactions tool.
pub async fn check_impl(checker: &Checker, params: CheckInteractionsParams) -> Result<CallToolResult, McpError> {
    let drugs = parse_drug_list(&params.drugs);
    if drugs.is_empty() {
        return Err(Error::InvalidInput("drugs must name at least one medication".into()).into());
    }

    tracing::debug!("checking interactions for {} drugs", drugs.len());

    let batch = checker.check_drugs(drugs).await;
    let report = params.include_report.then(|| render_report(&batch));
    let output = CheckInteractionsOutput { batch, report };

    Ok(CallToolResult::success(vec![Content::text(
        to_json_pretty(&output),
    )]))
}
