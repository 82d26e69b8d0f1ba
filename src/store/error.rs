use thiserror::Error;

/// Failures the store can signal. "Not found" conditions are never errors;
/// they come back as `None` or `false` from the individual operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username or email already registered")]
    DuplicateCredential,
    #[error("credential hashing failed: {0}")]
    Credential(String),
}
