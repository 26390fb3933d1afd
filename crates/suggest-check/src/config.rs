//! Configuration for the remote checker and the suggestion session.
//!
//! ```toml
//! endpoint = "http://127.0.0.1:5000/api/actions"
//! request_timeout_ms = 10000
//! highlight_class = "syntax-error-highlight"
//! max_concurrent_requests = 8
//! discard_stale_scans = true
//! ```
//!
//! Every field is optional; missing fields take the defaults above (no concurrency limit).

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use suggest_core::SYNTAX_ERROR_CLASS;

/// Default checker endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/actions";

/// Settings for [`crate::HttpGrammarService`] and [`crate::SuggestionSession`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuggestConfig {
    /// URL the sentence payload is POSTed to.
    pub endpoint: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// CSS class for suggestion highlights.
    pub highlight_class: String,
    /// Upper bound on in-flight checker requests per scan. `None` means unbounded.
    pub max_concurrent_requests: Option<usize>,
    /// Drop scan results that were overtaken by a newer scan or a document edit.
    pub discard_stale_scans: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: 10_000,
            highlight_class: SYNTAX_ERROR_CLASS.to_string(),
            max_concurrent_requests: None,
            discard_stale_scans: true,
        }
    }
}

impl SuggestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "endpoint",
                message: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_ms",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_concurrent_requests == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_concurrent_requests",
                message: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = SuggestConfig::from_toml_str("").unwrap();
        assert_eq!(config, SuggestConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.highlight_class, "syntax-error-highlight");
        assert!(config.discard_stale_scans);
    }

    #[test]
    fn test_overrides() {
        let config = SuggestConfig::from_toml_str(
            r#"
            endpoint = "https://check.example/api/actions"
            max_concurrent_requests = 4
            discard_stale_scans = false
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "https://check.example/api/actions");
        assert_eq!(config.max_concurrent_requests, Some(4));
        assert!(!config.discard_stale_scans);
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            SuggestConfig::from_toml_str("request_timeout_ms = 0"),
            Err(ConfigError::Invalid {
                field: "request_timeout_ms",
                ..
            })
        ));
        assert!(matches!(
            SuggestConfig::from_toml_str("max_concurrent_requests = 0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            SuggestConfig::from_toml_str("endpoint = 3"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            SuggestConfig::from_toml_str("unknown = true"),
            Err(ConfigError::Toml(_))
        ));
    }
}
