//! Error types for ingestion, storage and queries.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::path::PathBuf;

/// A source line or record block that could not be parsed.
///
/// Never fatal: the offending record is skipped and the failure is collected
/// as a warning so that a noisy corpus can still be partially ingested.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed record at line {line}: {reason}")]
pub struct MalformedRecord {
    /// 1-based line number of the offending line (or first line of the block).
    pub line: usize,

    /// Why the record was rejected.
    pub reason: String,

    /// The offending text, folded onto one line.
    pub text: String,
}

impl MalformedRecord {
    /// Create a malformed record warning.
    #[must_use]
    pub fn new(line: usize, reason: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
            text: text.into(),
        }
    }
}

/// Errors from the key-value store collaborator.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store could not be reached or rejected the command.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the failure
        message: String,
    },
}

impl StoreError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::unavailable(err.to_string())
    }
}

/// Errors from the index store adapter.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored value exists but cannot be decoded.
    #[error("Corrupt index entry at '{key}': {reason}")]
    Corrupt {
        /// Key holding the bad value
        key: String,
        /// Decoding failure
        reason: String,
    },

    /// A write was refused because the value does not belong under its key.
    #[error("Refused to write '{key}': {reason}")]
    Mismatch {
        /// Key being written
        key: String,
        /// What did not match
        reason: String,
    },

    /// A value could not be encoded before writing.
    #[error("Failed to encode index entry '{key}': {source}")]
    Encode {
        /// Key being written
        key: String,
        /// Serialization failure
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Create a corrupt entry error.
    #[must_use]
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a key mismatch error.
    #[must_use]
    pub fn mismatch(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Mismatch {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error means the stored bytes are bad.
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// Errors from the query service.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// The queried key has never been ingested.
    #[error("Not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Request parameter failed validation.
    #[error("Validation error: {message}")]
    Validation {
        /// Parameter that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// The key-value store is unreachable.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// An entry could not be encoded or was refused (only reachable through misuse).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if the queried entry is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Convert to a user-friendly error message for HTTP and CLI output.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::NotFound { resource } => {
                format!("Not found: {resource}. It has not been ingested.")
            }
            Self::Validation { field, message } => {
                format!("Invalid parameter '{field}': {message}")
            }
            Self::StoreUnavailable(_) => {
                "The index store is unavailable. Please retry later.".to_string()
            }
            Self::Internal(_) => self.to_string(),
        }
    }
}

impl From<IndexError> for QueryError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Store(store) => Self::StoreUnavailable(store),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Errors that abort an ingestion run.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// Source file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Source file path
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Source file does not match its expected MD5 digest.
    #[error(
        "Checksum mismatch for {}: expected {expected}, got {actual}",
        path.display()
    )]
    ChecksumMismatch {
        /// Source file path
        path: PathBuf,
        /// Expected hex digest
        expected: String,
        /// Actual hex digest
        actual: String,
    },

    /// Writing the indexes failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A blocking parse task panicked or was cancelled.
    #[error("Parse task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IngestError {
    /// Create an I/O error for a source path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for index store adapter operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for ingestion runs.
pub type IngestResult<T> = Result<T, IngestError>;
