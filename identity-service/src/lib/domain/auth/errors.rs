use thiserror::Error;

use crate::user::errors::UserError;

/// Error from the session store backend.
///
/// Absence of a session is never an error; only the store being unable to
/// answer lands here.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    #[error("Session store error: {0}")]
    Backend(String),
}

/// Top-level error for authentication operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Covers both unknown email and failed verification; deliberately
    /// silent about which, so callers cannot enumerate registered emails.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}
