use thiserror::Error;

/// Errors raised by the client core.
///
/// None of these are retried automatically: every failure is terminal for the
/// current job and the caller must `reset()` before submitting again.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Rejected locally, before any network traffic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A research job is already active; only one handle may be live.
    #[error("a research job is already active; reset before submitting again")]
    AlreadyActive,

    /// Transport-level failure (connect, IO, TLS) on one of the endpoints.
    #[error("request to {endpoint} failed: {message}")]
    Transport {
        endpoint: &'static str,
        message: String,
    },

    /// The endpoint answered with a non-success status code.
    #[error("{endpoint} returned HTTP {status}")]
    HttpStatus {
        endpoint: &'static str,
        status: u16,
    },

    /// The endpoint answered 2xx but the body did not match the contract.
    #[error("failed to decode {endpoint} response: {message}")]
    Decode {
        endpoint: &'static str,
        message: String,
    },
}

impl ResearchError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
