//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DDICHECK_*)
//! 2. TOML config file (if DDICHECK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Placeholder substituted with the drug identifier in `lookup_url`.
pub const DRUG_PLACEHOLDER: &str = "{drug}";

/// CSS selectors that locate interaction data in a lookup page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Container for the whole interactions section. First match is used.
    #[serde(default = "default_section")]
    pub section: String,

    /// One interaction entry, searched inside the section.
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Entry title, searched inside an entry.
    #[serde(default = "default_title")]
    pub title: String,

    /// Entry detail text, searched inside an entry.
    #[serde(default = "default_detail")]
    pub detail: String,

    /// Optional severity label, searched inside an entry.
    #[serde(default = "default_severity")]
    pub severity: String,
}

fn default_section() -> String {
    "div.page-section-interactions".into()
}

fn default_entry() -> String {
    "div.interaction-list".into()
}

fn default_title() -> String {
    "h4".into()
}

fn default_detail() -> String {
    "p".into()
}

fn default_severity() -> String {
    "span.severity".into()
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            section: default_section(),
            entry: default_entry(),
            title: default_title(),
            detail: default_detail(),
            severity: default_severity(),
        }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DDICHECK_*)
/// 2. TOML config file (if DDICHECK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Lookup page address. `{drug}` is replaced by the drug identifier.
    ///
    /// Set via DDICHECK_LOOKUP_URL environment variable.
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    /// Percent-encode drug identifiers before substituting them.
    ///
    /// Set via DDICHECK_ENCODE_DRUG_NAMES environment variable.
    #[serde(default = "default_true")]
    pub encode_drug_names: bool,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via DDICHECK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per lookup page.
    ///
    /// Set via DDICHECK_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via DDICHECK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    ///
    /// Set via DDICHECK_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Number of drugs looked up at once. 1 runs lookups one after another.
    ///
    /// Set via DDICHECK_MAX_CONCURRENCY environment variable.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Selectors used by the extractor.
    ///
    /// Set via DDICHECK_MARKERS__<FIELD> environment variables.
    #[serde(default)]
    pub markers: Markers,
}

fn default_lookup_url() -> String {
    "https://www.drugs.com/drug_interactions.html?drugs={drug}".into()
}

fn default_user_agent() -> String {
    "ddicheck/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_concurrency() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lookup_url: default_lookup_url(),
            encode_drug_names: true,
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_concurrency: default_max_concurrency(),
            markers: Markers::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DDICHECK_`
    /// 2. TOML file from `DDICHECK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DDICHECK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::from_figment(figment.merge(Self::env_provider()))
    }

    fn env_provider() -> Env {
        Env::prefixed("DDICHECK_")
            .ignore(&["CONFIG_FILE"])
            .map(|key| key.as_str().to_lowercase().into())
            .split("__")
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
