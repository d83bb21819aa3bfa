//! Lookup URL construction from the configured template.

use ddicheck_core::config::DRUG_PLACEHOLDER;
use url::form_urlencoded;

/// Error type for lookup URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty drug name")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Build the lookup page URL for a drug.
///
/// Steps:
/// 1. Trim the drug name
/// 2. Form-encode it when `encode` is set, otherwise use it verbatim
/// 3. Substitute it for `{drug}` in the template
/// 4. Parse, require http(s), and drop any fragment
pub fn lookup_url(template: &str, drug: &str, encode: bool) -> Result<url::Url, UrlError> {
    let name = drug.trim();

    if name.is_empty() {
        return Err(UrlError::Empty);
    }

    let value = if encode { form_urlencoded::byte_serialize(name.as_bytes()).collect() } else { name.to_string() };

    let mut parsed = url::Url::parse(&template.replace(DRUG_PLACEHOLDER, &value))
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
