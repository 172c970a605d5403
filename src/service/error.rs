//! Submission and query errors.

use thiserror::Error;

use crate::args::CoerceError;
use crate::chain::types::{BuildError, Id, KeyError};

/// Errors surfaced by the service operations.
///
/// Every variant is final for the call that produced it: nothing is retried
/// and a rejected submission never reaches the pending pool.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request is missing a required field.
    #[error("arguments failed validation: {0}")]
    Validation(String),

    /// An argument's value does not fit its declared type.
    #[error("couldn't parse arg {index} (type '{type_tag}'): {source}")]
    Argument {
        index: usize,
        type_tag: String,
        #[source]
        source: CoerceError,
    },

    /// The signing key bytes are not a valid key.
    #[error("couldn't parse 'privateKey' to a SECP256K1 private key: {0}")]
    Key(#[source] KeyError),

    /// Transaction construction or signing failed.
    #[error("couldn't create tx: {0}")]
    Build(#[from] BuildError),

    /// No stored transaction has this ID.
    #[error("couldn't find tx with ID {0}")]
    NotFound(Id),

    /// A fresh key could not be generated.
    #[error("couldn't create new private key: {0}")]
    KeyGeneration(#[source] KeyError),
}

impl ServiceError {
    /// Short label used for metrics and error data.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Argument { .. } => "argument",
            ServiceError::Key(_) => "key",
            ServiceError::Build(_) => "build",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::KeyGeneration(_) => "key_generation",
        }
    }

    /// Whether the caller can fix this by correcting the request.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_) | ServiceError::Argument { .. } | ServiceError::Key(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::WireValue;

    #[test]
    fn test_argument_error_context() {
        let err = ServiceError::Argument {
            index: 1,
            type_tag: "int64".to_string(),
            source: CoerceError::NotConvertible {
                value: WireValue::Other(serde_json::json!("bad")),
                target: "int64",
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("arg 1"));
        assert!(msg.contains("int64"));
        assert!(msg.contains("\"bad\""));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_not_found_message() {
        let id = Id::digest(b"missing");
        let err = ServiceError::NotFound(id);
        assert_eq!(err.to_string(), format!("couldn't find tx with ID {}", id));
        assert_eq!(err.kind(), "not_found");
        assert!(!err.is_caller_error());
    }
}
