use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::UserId;
use crate::domain::user::models::UserView;

/// Opaque session identifier.
///
/// Freshly generated identifiers carry 122 bits of OS randomness; arbitrary
/// client-supplied strings also wrap into this type for lookups, where they
/// simply fail to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for SessionId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Server-held binding of a session identifier to a user.
///
/// The user reference is weak: deleting the user does not revoke the
/// session eagerly, it just stops resolving on next use.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A freshly authenticated user together with the session bound to them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserView,
    pub session_id: SessionId,
}

/// Who the caller is, as far as the presented session says.
///
/// Anonymous is a normal state, not a failure.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated(UserView),
}
