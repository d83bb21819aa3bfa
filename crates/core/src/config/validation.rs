//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, DRUG_PLACEHOLDER};
use thiserror::Error;

/// Upper bound for `max_concurrency`.
pub const MAX_CONCURRENCY_LIMIT: usize = 16;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `lookup_url` lacks the `{drug}` placeholder or is not an http(s) URL
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `max_concurrency` is 0 or exceeds 16
    /// - any marker selector is blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_lookup_url()?;

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.max_concurrency == 0 {
            return Err(invalid("max_concurrency", "must be at least 1"));
        }
        if self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(invalid("max_concurrency", "must not exceed 16"));
        }

        let markers = [
            ("markers.section", &self.markers.section),
            ("markers.entry", &self.markers.entry),
            ("markers.title", &self.markers.title),
            ("markers.detail", &self.markers.detail),
            ("markers.severity", &self.markers.severity),
        ];
        for (field, selector) in markers {
            if selector.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        if !self.encode_drug_names {
            tracing::warn!("encode_drug_names is off; drug names are substituted into the lookup URL verbatim");
        }

        Ok(())
    }

    fn validate_lookup_url(&self) -> Result<(), ConfigError> {
        if !self.lookup_url.contains(DRUG_PLACEHOLDER) {
            return Err(invalid("lookup_url", "must contain the {drug} placeholder"));
        }

        let sample = self.lookup_url.replace(DRUG_PLACEHOLDER, "sample");
        let parsed = url::Url::parse(&sample).map_err(|e| invalid("lookup_url", &e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(invalid("lookup_url", "scheme must be http or https")),
        }
    }
}
