//! Error types for card synchronization.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by a [`BoardApi`](crate::BoardApi) implementation.
#[derive(Debug, Error)]
pub enum BoardApiError {
    /// Request never produced a response (connect, timeout, TLS).
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Provider answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl BoardApiError {
    /// URL of the failing request.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Transport { url, .. } | Self::Status { url, .. } | Self::Decode { url, .. } => {
                url
            }
        }
    }

    /// HTTP status, when the provider answered at all.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
            Self::Decode { .. } => None,
        }
    }

    /// Short human-readable reason for logs.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Transport { source, .. } => source.to_string(),
            Self::Status { status, body, .. } => {
                let reason = status.canonical_reason().unwrap_or("Unknown");
                if body.is_empty() {
                    reason.to_string()
                } else {
                    format!("{reason}: {body}")
                }
            }
            Self::Decode { message, .. } => message.clone(),
        }
    }
}

/// Configuration errors, raised before any provider call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable missing or empty.
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    /// Action kind outside the supported set.
    #[error("Unknown action kind '{0}' (expected 'attachment' or 'comment')")]
    UnknownAction(String),

    /// Action kind that is recognised but has no handler.
    #[error("Action kind '{0}' is not supported")]
    UnsupportedAction(String),

    /// Card id marker is empty.
    #[error("Card id pattern must not be empty")]
    EmptyPattern,

    /// Card id marker could not be compiled into a matcher.
    #[error("Invalid card id pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Value could not be parsed.
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    /// HTTP client construction failed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors that abort processing of an event.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Title or branch name yielded no card references.
    #[error("Invalid title or branch: title={title:?}, branch={branch:?}")]
    InvalidReference {
        title: String,
        branch: Option<String>,
    },

    /// Configuration rejected while building the engine.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
