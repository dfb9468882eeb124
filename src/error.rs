use thiserror::Error;

use crate::config::ConfigError;
use crate::core::Website;

/// Main error type for the mod finder
#[derive(Error, Debug)]
pub enum ModFinderError {
    /// HTTP request errors
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    /// The remote catalog answered with HTTP 429
    #[error("Provider '{provider}' is rate limiting requests")]
    RateLimited { provider: String },

    /// No candidate qualified as a match
    #[error("No mod found for query: {0}")]
    NotFound(String),

    /// Website name not recognised
    #[error("Unknown website: {0}")]
    UnknownWebsite(String),

    /// Mod loader name not recognised
    #[error("Unknown mod loader: {0}")]
    UnknownLoader(String),

    /// No provider registered for the website
    #[error("No provider configured for {0}")]
    ProviderUnavailable(Website),
}

impl ModFinderError {
    pub(crate) fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ModFinderError::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// True when the failure came from a request that ran out of time
    pub fn is_timeout(&self) -> bool {
        matches!(self, ModFinderError::HttpRequest(e) if e.is_timeout())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ModFinderError>;
