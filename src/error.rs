//! Error taxonomy shared by the transport, catalog client and resolver.

use thiserror::Error;

/// Errors surfaced by the catalog core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Transport-level fault (connect/timeout/reset). Retryable until the
    /// last attempt, at which point it propagates as-is.
    #[error("network error: {0}")]
    TransientNetwork(String),

    /// Non-2xx status on the final attempt, or a body that failed to decode.
    /// Carries the final attempt's payload so callers can still inspect it.
    #[error("fatal response (status {status}): {body}")]
    FatalResponse { status: u16, body: String },

    /// Credential exchange succeeded at the HTTP level but the response is
    /// missing the expected user-info fields.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The metadata resolver exhausted every tier without a hit.
    #[error("no metadata match found for '{0}'")]
    NoMatchFound(String),
}

impl CoreError {
    /// Whether the transport is allowed to retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::TransientNetwork(_))
    }
}
