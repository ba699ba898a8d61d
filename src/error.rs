//! Caller-misuse and construction errors.
//!
//! Remote and network failures are never errors in this crate: they are
//! classified into an [`OutcomeKind`](crate::envelope::OutcomeKind). The
//! variants here cover the cases where a request must not be sent at all.

use thiserror::Error;

/// Errors raised before any request leaves the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key was configured; every API endpoint requires one.
    #[error("missing API key for {operation}\n  Suggestion: {suggestion}")]
    MissingApiKey {
        /// The operation that was attempted.
        operation: &'static str,
        /// How to fix the issue.
        suggestion: &'static str,
    },

    /// An authenticated operation was called with an empty or invalidated credential.
    #[error("empty credential passed to {operation}\n  Suggestion: log in before calling {operation}")]
    EmptyCredential {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A configuration value is outside its accepted range or malformed.
    #[error("invalid configuration value for `{field}`: {reason}")]
    InvalidConfig {
        /// The offending configuration field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client construction failed: {source}")]
    HttpClientBuild {
        /// The builder error reported by reqwest.
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Creates a `MissingApiKey` error for `operation`.
    #[must_use]
    pub fn missing_api_key(operation: &'static str) -> Self {
        Self::MissingApiKey {
            operation,
            suggestion: "Set `api_key` in the config file or export OPENSUBTITLES_API_KEY",
        }
    }

    /// Creates an `EmptyCredential` error for `operation`.
    #[must_use]
    pub fn empty_credential(operation: &'static str) -> Self {
        Self::EmptyCredential { operation }
    }

    /// Creates an `InvalidConfig` error.
    #[must_use]
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by calling the API in the wrong state.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey { .. } | Self::EmptyCredential { .. }
        )
    }
}
