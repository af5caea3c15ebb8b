use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid user id: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email is required")]
    Missing,

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all user-record operations.
///
/// Variants group into the four outcomes the boundary knows how to render:
/// invalid input (locally detectable, no store call made), conflict
/// (uniqueness violation), and internal (store or hashing failure).
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Invalid input (automatically converted via #[from] where typed)
    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password is required")]
    MissingPassword,

    #[error("At least one user entry is required")]
    EmptyBatch,

    #[error("Filter is required")]
    MissingFilter,

    #[error("Update is required")]
    MissingUpdate,

    // Conflict
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Duplicate email detected ({inserted} inserted)")]
    DuplicateEmails { inserted: u64 },

    // Internal
    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
