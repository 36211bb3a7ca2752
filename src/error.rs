//! Error types for remote model platform calls.
//!
//! Every fallible operation in the crate returns [`PlatformError`]. The
//! variants split into three categories (see [`ErrorCategory`]): validation
//! failures raised before any network dispatch, transport failures surfaced
//! unmodified from the remote call, and parse failures for malformed remote
//! payloads. Nothing in this crate retries or swallows an error; callers see
//! exactly what happened, once.

use thiserror::Error;

/// Unified error type for all platform operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// Transport-level HTTP failure (connection, TLS, timeout).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The remote payload could not be interpreted.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A streaming body ended early or a chunk failed to decode.
    #[error("stream error: {0}")]
    Stream(String),

    /// Caller-supplied input failed validation before dispatch.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The model's capability set does not include the requested operation.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Internal invariant failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`PlatformError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad caller input; always raised before any network call.
    Validation,
    /// The remote call itself failed; retrying is a caller decision.
    Transport,
    /// The remote call succeeded but the payload was malformed.
    Parse,
    /// Invariant failure inside the client.
    Internal,
}

impl PlatformError {
    /// Shorthand for an API-status error.
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http(_) | Self::Api { .. } => ErrorCategory::Transport,
            Self::Parse(_) | Self::Stream(_) => ErrorCategory::Parse,
            Self::InvalidParameter(_) | Self::Unsupported(_) => ErrorCategory::Validation,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Whether this error was raised by input validation, before dispatch.
    pub fn is_validation(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation)
    }

    /// Whether this error came from the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_are_transport() {
        let err = PlatformError::api_error(429, "quota exceeded");
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.is_transport());
        assert!(!err.is_validation());
    }

    #[test]
    fn parameter_errors_are_validation() {
        let err = PlatformError::InvalidParameter("accelerator_type".into());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.is_validation());
    }

    #[test]
    fn display_includes_status() {
        let err = PlatformError::api_error(503, "unavailable");
        assert_eq!(err.to_string(), "API error 503: unavailable");
    }
}
