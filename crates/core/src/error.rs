//! Error types for the core model.

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the core model.
///
/// Unknown ids are deliberately absent: id-addressed mutations are no-ops
/// when the id is missing.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Caller-supplied input was rejected
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A serialized snapshot could not be decoded or failed validation
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}
