use std::time::Duration;

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::SessionStoreError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::Identity;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;

/// Keyed session storage with TTL support.
///
/// The store never distinguishes "never existed" from "expired"; both are
/// `None` on `get`. `delete` of an absent key is a no-op success.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Store a session under its identifier, live for `ttl`.
    async fn put(&self, session: Session, ttl: Duration) -> Result<(), SessionStoreError>;

    /// Fetch a live session; unknown or expired identifiers yield `None`.
    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Remove a session; idempotent.
    async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

/// Port for the authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and an authenticated session in one step.
    ///
    /// A successful registration always yields a live session.
    ///
    /// # Errors
    /// * `User(InvalidEmail | MissingPassword)` - malformed input
    /// * `User(EmailAlreadyExists)` - the normalized email is taken
    /// * `User(DatabaseError)` / `Session` - a collaborator failed
    async fn register(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Verify credentials and establish a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - unknown email or wrong password, never
    ///   saying which
    /// * `User(DatabaseError)` / `Session` - a collaborator failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Destroy a session. Destroying an absent session is still success.
    async fn logout(&self, session_id: &str) -> Result<(), AuthError>;

    /// Resolve the identity behind a presented session identifier.
    ///
    /// Missing, expired, and dangling (user deleted) sessions all resolve
    /// to `Identity::Anonymous`; only collaborator failures error.
    async fn current_identity(&self, session_id: Option<&str>) -> Result<Identity, AuthError>;
}
