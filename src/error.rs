//! Error types for scopecfg

use thiserror::Error;

/// Result type alias for scopecfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scopecfg
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("unexpected 'configure' key: '{0}'")]
    UnknownKey(String),

    // -------------------------------------------------------------------------
    // Value Errors
    // -------------------------------------------------------------------------
    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unsupported charset: '{0}'")]
    InvalidCharset(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error was caused by an unrecognized configure key
    #[must_use]
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, Error::UnknownKey(_))
    }

    /// Check if this error was caused by a value of the wrong shape
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    /// The configure key (or sub-field path) this error refers to, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::UnknownKey(key)
            | Error::TypeMismatch { key, .. }
            | Error::InvalidValue { key, .. } => Some(key),
            Error::InvalidCharset(_) | Error::Serialize(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_message_names_key() {
        let err = Error::UnknownKey("bogus".into());
        assert_eq!(err.to_string(), "unexpected 'configure' key: 'bogus'");
        assert!(err.is_unknown_key());
        assert_eq!(err.key(), Some("bogus"));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::TypeMismatch {
            key: "driver".into(),
            expected: "map".into(),
            actual: "string".into(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for driver: expected map, got string"
        );
        assert!(err.is_type_mismatch());
        assert!(!err.is_unknown_key());
    }

    #[test]
    fn test_invalid_charset_has_no_key() {
        let err = Error::InvalidCharset("klingon-8".into());
        assert!(err.key().is_none());
        assert!(err.to_string().contains("klingon-8"));
    }
}
