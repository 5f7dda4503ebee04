//! Storage error types.
//!
//! Every public storage operation returns an error value rather than
//! panicking. "Missing document on delete" is not an error at all: revocation
//! is idempotent and the storage traits normalize it to success.

/// Errors that can occur during credential storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No record matched the lookup key.
    ///
    /// Also covers the case where a token index record exists but the grant
    /// record it points at does not: the caller cannot distinguish "never
    /// existed" from "already reclaimed".
    #[error("not found: {0}")]
    NotFound(String),

    /// An insert collided with an existing primary key, from the underlying
    /// store's native duplicate-key signal.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A grant payload could not be serialized or deserialized.
    #[error("corrupt grant payload: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Any other driver or network level failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Create a `NotFound` error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    /// Create a `DuplicateKey` error.
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey(key.into())
    }

    /// Create a `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns `true` if this is a `NotFound` error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if this is a `DuplicateKey` error.
    #[must_use]
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    /// Returns `true` if this is a `Corrupt` error.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    /// Returns `true` if this is a `Backend` error.
    #[must_use]
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = StorageError::not_found("client abc123");
        assert!(err.is_not_found());
        assert!(!err.is_backend());
        assert_eq!(err.to_string(), "not found: client abc123");
    }

    #[test]
    fn test_duplicate_key() {
        let err = StorageError::duplicate_key("AT1");
        assert!(err.is_duplicate_key());
        assert_eq!(err.to_string(), "duplicate key: AT1");
    }

    #[test]
    fn test_corrupt_from_serde() {
        let json_err = serde_json::from_slice::<serde_json::Value>(b"not json").unwrap_err();
        let err = StorageError::from(json_err);
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_backend() {
        let err = StorageError::backend("connection reset");
        assert!(err.is_backend());
        assert!(!err.is_not_found());
    }
}
