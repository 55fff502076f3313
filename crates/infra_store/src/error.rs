//! Storage error types

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur reading or writing the local store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored text was not valid for the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data declares a schema this build cannot read
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchema(u32),

    /// Key contains characters not allowed in a storage key
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    /// Whether the error comes from the stored content rather than the medium
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            StoreError::Serialization(_) | StoreError::UnsupportedSchema(_)
        )
    }
}

impl From<StoreError> for PortError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Io(e) => PortError::Connection {
                message: "local store unavailable".to_string(),
                source: Some(Box::new(e)),
            },
            StoreError::Serialization(e) => PortError::Transformation {
                message: e.to_string(),
            },
            StoreError::UnsupportedSchema(v) => PortError::Transformation {
                message: format!("unsupported schema version {v}"),
            },
            StoreError::InvalidKey(key) => PortError::validation(format!("invalid key {key}")),
        }
    }
}
