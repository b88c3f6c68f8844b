//! Error types for ACL configuration
//!
//! Evaluating and defining rules never fails. Errors only come from loading
//! configuration: policy documents and environment variables.

use thiserror::Error;

/// ACL configuration error types.
#[derive(Debug, Error)]
pub enum AclError {
    /// Policy document could not be parsed
    #[error("Invalid policy document: {0}")]
    InvalidPolicy(#[from] serde_json::Error),

    /// Configuration value could not be parsed
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Result type for ACL configuration operations.
pub type AclResult<T> = Result<T, AclError>;

impl AclError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AclError::InvalidPolicy(_) => "INVALID_POLICY",
            AclError::InvalidValue { .. } => "INVALID_CONFIG_VALUE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AclError::InvalidValue {
            key: "DOT_ACL_DEFAULT_ACCESS".to_string(),
            message: "expected a boolean".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_CONFIG_VALUE");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for DOT_ACL_DEFAULT_ACCESS: expected a boolean"
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AclError::from(parse).error_code(), "INVALID_POLICY");
    }
}
