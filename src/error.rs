//! Public error taxonomy for game-insights.
//!
//! Errors are raised at the `Collector` (public API boundary) so external
//! wrappers can map them to HTTP status codes:
//!
//! - [`GameInsightsError::NotFound`] -> 404 Not Found
//! - [`GameInsightsError::SourceUnavailable`] -> 503 Service Unavailable
//! - [`GameInsightsError::InvalidRequest`] -> 422 Unprocessable Entity
//! - everything else -> 500 Internal Server Error
//!
//! The source layer never constructs these variants directly; it reports
//! failures as raw strings which `collector::classify` translates through a
//! single authoritative mapping.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for game-insights operations
pub type Result<T> = std::result::Result<T, GameInsightsError>;

/// Error types surfaced by the collector and the CLI layer
#[derive(Debug, Error)]
pub enum GameInsightsError {
    /// The game or user does not exist per the authoritative source.
    ///
    /// Only the primary source (SteamStore for games, SteamUser for users)
    /// is allowed to produce this; supplementary sources are downgraded to
    /// [`GameInsightsError::SourceUnavailable`] before raising.
    #[error("{message}")]
    NotFound { identifier: String, message: String },

    /// A data source is unreachable or its response could not be parsed.
    /// The entity may still exist.
    #[error("Source '{source_name}' is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// The caller passed invalid input to a public Collector method,
    /// e.g. an empty identifier list in strict mode.
    #[error("{message}")]
    InvalidRequest { message: String },

    /// Unclassified failure, treated as internal/unexpected.
    #[error("{message}")]
    General { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GameInsightsError {
    /// Create a `NotFound` error with the default message for an identifier
    pub fn not_found<S: Into<String>>(identifier: S) -> Self {
        let identifier = identifier.into();
        let message = format!("Game with appid '{identifier}' was not found.");
        Self::NotFound {
            identifier,
            message,
        }
    }

    /// Create a `NotFound` error carrying the raw source message
    pub fn not_found_with_message<S: Into<String>>(identifier: S, message: S) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create a new source unavailable error
    pub fn source_unavailable<S: Into<String>>(source: S, reason: S) -> Self {
        Self::SourceUnavailable {
            source_name: source.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// True for the typed variants a caller is expected to match on
    /// (as opposed to IO/serialization plumbing errors).
    pub fn is_classified(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::SourceUnavailable { .. }
                | Self::InvalidRequest { .. }
                | Self::General { .. }
        )
    }
}
