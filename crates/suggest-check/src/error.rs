use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while calling the remote checker.
pub enum CheckError {
    #[error("request failed: {0}")]
    /// Transport-level failure (connect, timeout, body read).
    Http(#[from] reqwest::Error),

    #[error("checker returned HTTP {status}: {body}")]
    /// The checker answered with a non-success status.
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    #[error("invalid checker response: {0}")]
    /// The response body was not a valid check response.
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    /// Any other failure reported by a service implementation.
    Other(String),
}

#[derive(Debug, Error)]
/// Errors produced while loading configuration.
pub enum ConfigError {
    #[error("I/O error: {0}")]
    /// Reading the configuration file failed.
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    /// The configuration file is not valid TOML for [`crate::SuggestConfig`].
    Toml(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {message}")]
    /// A field has an unusable value.
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}
