use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No matching user, message, or (for thread listings) no messages at all.
    #[error("not found: {0}")]
    NotFound(String),

    /// A caller broke the calling discipline, e.g. recording a login for a
    /// username that was never authenticated. Always a bug, never retried.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("store failure: {0}")]
    Store(#[from] anyhow::Error),
}
