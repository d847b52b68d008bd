//! Error types for the unify document vault.

use thiserror::Error;

/// Result type alias using unify's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The source file could not be read or encoded
    #[error("File read error: {0}")]
    FileRead(String),

    /// No stored document has the requested id
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Delete confirmation token is unknown or was already used
    #[error("Invalid or expired delete confirmation")]
    InvalidConfirmation,

    /// Persisted collection could not be parsed
    #[error("Storage corrupt: {0}")]
    StorageCorrupt(String),

    /// Slot store quota exceeded
    #[error("Storage full: {needed} bytes needed, quota is {quota} bytes")]
    StorageFull { needed: usize, quota: usize },

    /// Stored payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// External response did not match the declared schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_file_read() {
        let err = Error::FileRead("permission denied".to_string());
        assert_eq!(err.to_string(), "File read error: permission denied");
    }

    #[test]
    fn test_error_display_document_not_found() {
        let id = Uuid::nil();
        let err = Error::DocumentNotFound(id);
        assert_eq!(err.to_string(), format!("Document not found: {}", id));
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("name must not be empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: name must not be empty");
    }

    #[test]
    fn test_error_display_storage_full() {
        let err = Error::StorageFull {
            needed: 10,
            quota: 5,
        };
        assert_eq!(
            err.to_string(),
            "Storage full: 10 bytes needed, quota is 5 bytes"
        );
    }

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = Error::SchemaMismatch("missing field `title`".to_string());
        assert_eq!(err.to_string(), "Schema mismatch: missing field `title`");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => {
                assert!(!msg.is_empty());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_base64_error() {
        use base64::Engine;
        let decode_err = base64::engine::general_purpose::STANDARD
            .decode("***")
            .unwrap_err();
        let err: Error = decode_err.into();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
