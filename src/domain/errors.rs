//! Error Taxonomy
//!
//! Every failure the client can surface, from transport problems to
//! payload-level errors reported by the API itself.

use crate::domain::response::Response;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ParityVendError>;

/// Errors surfaced by the ParityVend client.
#[derive(Debug, thiserror::Error)]
pub enum ParityVendError {
    /// The API could not be reached (DNS, TCP, TLS or timeout).
    #[error("not able to reach the ParityVend API: {0}")]
    Connection(String),

    /// Non-200 status or a JSON response that could not be decoded.
    #[error("ParityVend API error: {0}")]
    Api(String),

    /// The API answered with `status: "error"`.
    #[error("ParityVend API returned error: {payload}")]
    Processing {
        /// The decoded error payload, kept for inspection.
        payload: Box<Response>,
    },

    /// The account has used up its monthly request quota.
    #[error("your account has exceeded the quota, upgrade your billing plan to continue")]
    QuotaExceeded,

    /// Invalid country code, IP or currency argument.
    #[error("validation: {0}")]
    Validation(String),

    /// A field was requested from a response that does not carry it.
    #[error("missing field: {0}")]
    MissingField(String),
}

impl ParityVendError {
    pub(crate) fn processing(payload: Response) -> Self {
        Self::Processing {
            payload: Box::new(payload),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, Self::Processing { .. })
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded)
    }

    /// The `error_name` reported by the API, for processing errors.
    pub fn error_name(&self) -> Option<&str> {
        match self {
            Self::Processing { payload } => payload.error_name(),
            _ => None,
        }
    }

    /// The error payload, for processing errors.
    pub fn payload(&self) -> Option<&Response> {
        match self {
            Self::Processing { payload } => Some(payload),
            _ => None,
        }
    }
}
