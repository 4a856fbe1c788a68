//! Unified error handling for the client engine.
//!
//! No error crosses a component boundary as an unstructured panic; every
//! public operation returns `Result<T, AppError>` so callers can chain
//! without try/catch-style control flow.

use thiserror::Error;

use crate::rpc::CallError;

/// Application-level error type for the client engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backend call failed (transport, decode, or logical failure).
    #[error("Call error: {0}")]
    Call(#[from] CallError),

    /// The current session is not allowed to perform the action.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Client-side validation rejected the input before any backend call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backing data is absent.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p-123".to_string());
        assert_eq!(err.to_string(), "Not found: product p-123");

        let err = AppError::Validation("shipping address is required".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: shipping address is required"
        );
    }

    #[test]
    fn test_call_error_conversion() {
        let call = CallError::Backend {
            message: "Insufficient stock".to_string(),
        };
        let err = AppError::from(call);
        assert!(matches!(err, AppError::Call(CallError::Backend { .. })));
        assert_eq!(err.to_string(), "Call error: Insufficient stock");
    }
}
