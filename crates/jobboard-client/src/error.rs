use thiserror::Error;

/// Everything a container operation can fail with.
///
/// Containers record `to_string()` of these in their `error` field, so the
/// display text is what a user ends up seeing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Non-success HTTP status, network failure or undecodable body
    #[error("{0}")]
    Transport(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Job not found")]
    NotFound,

    /// Session storage I/O; never surfaced through container state
    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
