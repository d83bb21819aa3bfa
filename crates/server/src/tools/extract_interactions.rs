//! extract_interactions tool implementation.
//!
//! This tool extracts interaction records from lookup page HTML.
//! No network I/O is performed - HTML is provided by the client.

use ddicheck_client::{Extractor, InteractionExtractor, to_json_pretty};
use ddicheck_core::{Error, Extraction};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for extract_interactions tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractInteractionsParams {
    /// The raw HTML of a drug interaction lookup page.
    pub html: String,
}

/// Output structure for extract_interactions tool.
pub type ExtractInteractionsOutput = Extraction;

/// Implementation of the extract_interactions tool.
pub async fn extract_impl(
    extractor: &InteractionExtractor, params: ExtractInteractionsParams,
) -> Result<CallToolResult, McpError> {
    if params.html.trim().is_empty() {
        return Err(Error::InvalidInput("html cannot be empty".into()).into());
    }

    let output: ExtractInteractionsOutput = extractor.extract(params.html.as_bytes());

    Ok(CallToolResult::success(vec![Content::text(
        to_json_pretty(&output),
    )]))
}
