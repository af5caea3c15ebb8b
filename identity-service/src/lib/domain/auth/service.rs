use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::Identity;
use crate::domain::auth::models::SessionId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::SessionStore;
use crate::domain::auth::sessions::SessionManager;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UserView;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

/// Coordinates credential verification, the user collection, and the
/// session manager into the register/login/logout/identity flows.
pub struct AuthService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    repository: Arc<R>,
    sessions: SessionManager<S>,
    password_hasher: auth::PasswordHasher,
}

impl<R, S> AuthService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    pub fn new(repository: Arc<R>, sessions: SessionManager<S>) -> Self {
        Self {
            repository,
            sessions,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<R, S> AuthServicePort for AuthService<R, S>
where
    R: UserRepository,
    S: SessionStore,
{
    async fn register(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = EmailAddress::new(email.to_string()).map_err(UserError::from)?;
        if password.is_empty() {
            return Err(UserError::MissingPassword.into());
        }

        // Pre-check is advisory; the store's unique index settles races.
        if self
            .repository
            .find_by_email(email.as_str())
            .await
            .map_err(AuthError::from)?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(email.as_str().to_string()).into());
        }

        let password_hash = self
            .password_hasher
            .hash(password)
            .map_err(UserError::from)?;
        let user = self
            .repository
            .insert(NewUser {
                email,
                password_hash,
            })
            .await
            .map_err(AuthError::from)?;

        // Registration implies login: the caller walks away authenticated.
        let session_id = self.sessions.create(user.id).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession {
            user: UserView::from(&user),
            session_id,
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let normalized = EmailAddress::normalize(email);

        // Unknown email and wrong password take the same exit.
        let Some(user) = self
            .repository
            .find_by_email(&normalized)
            .await
            .map_err(AuthError::from)?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let verified = self
            .password_hasher
            .verify(password, &user.password_hash)
            .map_err(UserError::from)?;
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        let session_id = self.sessions.create(user.id).await?;

        Ok(AuthSession {
            user: UserView::from(&user),
            session_id,
        })
    }

    async fn logout(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions
            .destroy(&SessionId::from(session_id))
            .await
            .map_err(AuthError::from)
    }

    async fn current_identity(&self, session_id: Option<&str>) -> Result<Identity, AuthError> {
        let Some(raw) = session_id else {
            return Ok(Identity::Anonymous);
        };

        let Some(user_id) = self.sessions.resolve(&SessionId::from(raw)).await? else {
            return Ok(Identity::Anonymous);
        };

        // Weak reference: a session whose user has since been deleted stops
        // resolving here instead of being revoked eagerly.
        match self
            .repository
            .find_by_id(&user_id)
            .await
            .map_err(AuthError::from)?
        {
            Some(user) => Ok(Identity::Authenticated(UserView::from(&user))),
            None => Ok(Identity::Anonymous),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;
    use uuid::Uuid;

    use super::*;
    use crate::domain::auth::errors::SessionStoreError;
    use crate::domain::auth::models::Session;
    use crate::domain::user::models::BulkInsert;
    use crate::domain::user::models::UpdateReport;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserChanges;
    use crate::domain::user::models::UserFilter;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserStats;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn insert(&self, user: NewUser) -> Result<User, UserError>;
            async fn insert_many(&self, users: Vec<NewUser>) -> Result<BulkInsert, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<crate::domain::user::models::UserView>, UserError>;
            async fn find_by_query(&self, filter: &UserFilter) -> Result<Vec<crate::domain::user::models::UserView>, UserError>;
            async fn page_after(&self, after: Option<UserId>, limit: i64) -> Result<Vec<crate::domain::user::models::UserView>, UserError>;
            async fn update_one(&self, id: &UserId, changes: &UserChanges) -> Result<UpdateReport, UserError>;
            async fn update_many(&self, filter: &UserFilter, changes: &UserChanges) -> Result<UpdateReport, UserError>;
            async fn replace_one(&self, id: &UserId, email: &str, password_hash: &str) -> Result<UpdateReport, UserError>;
            async fn delete_one(&self, id: &UserId) -> Result<u64, UserError>;
            async fn delete_many(&self, filter: &UserFilter) -> Result<u64, UserError>;
            async fn stats(&self) -> Result<UserStats, UserError>;
        }
    }

    mock! {
        pub TestSessionStore {}

        #[async_trait]
        impl SessionStore for TestSessionStore {
            async fn put(&self, session: Session, ttl: Duration) -> Result<(), SessionStoreError>;
            async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;
            async fn delete(&self, id: &SessionId) -> Result<(), SessionStoreError>;
        }
    }

    fn stored_user(email: &str, password: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId(Uuid::new_v4()),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: auth::PasswordHasher::new().hash(password).unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    fn fresh_store() -> MockTestSessionStore {
        let mut store = MockTestSessionStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_put().returning(|_, _| Ok(()));
        store
    }

    fn service(
        repository: MockTestUserRepository,
        store: MockTestSessionStore,
    ) -> AuthService<MockTestUserRepository, MockTestSessionStore> {
        AuthService::new(
            Arc::new(repository),
            SessionManager::new(Arc::new(store), Duration::from_secs(3600)),
        )
    }

    #[tokio::test]
    async fn test_register_yields_authenticated_session() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .with(eq("alice@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_insert()
            .withf(|user| {
                user.email.as_str() == "alice@x.com" && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| {
                let now = Utc::now();
                Ok(User {
                    id: UserId(Uuid::new_v4()),
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: now,
                    updated_at: now,
                })
            });

        let service = service(repository, fresh_store());

        let session = service.register(" Alice@X.com ", "secret1").await.unwrap();
        assert_eq!(session.user.email, "alice@x.com");
        assert!(!session.session_id.as_str().is_empty());
    }

    #[tokio::test]
    async fn test_register_existing_email_creates_no_session() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(stored_user(email, "secret1"))));
        repository.expect_insert().times(0);

        let mut store = MockTestSessionStore::new();
        store.expect_put().times(0);

        let service = service(repository, store);

        let result = service.register("alice@x.com", "secret1").await;
        assert!(matches!(
            result,
            Err(AuthError::User(UserError::EmailAlreadyExists(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_missing_fields() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);

        let service = service(repository, MockTestSessionStore::new());

        let no_email = service.register("", "secret1").await;
        assert!(matches!(
            no_email,
            Err(AuthError::User(UserError::InvalidEmail(_)))
        ));

        let no_password = service.register("alice@x.com", "").await;
        assert!(matches!(
            no_password,
            Err(AuthError::User(UserError::MissingPassword))
        ));
    }

    #[tokio::test]
    async fn test_login_success_establishes_session() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .with(eq("alice@x.com"))
            .times(1)
            .returning(|email| Ok(Some(stored_user(email, "secret1"))));

        let service = service(repository, fresh_store());

        let session = service.login("Alice@X.com", "secret1").await.unwrap();
        assert_eq!(session.user.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        // Unknown email.
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        let service_unknown = service(repository, MockTestSessionStore::new());
        let unknown = service_unknown.login("ghost@x.com", "secret1").await;

        // Known email, wrong password.
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(stored_user(email, "secret1"))));
        let service_wrong = service(repository, MockTestSessionStore::new());
        let wrong = service_wrong.login("alice@x.com", "secret2").await;

        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        assert_eq!(
            unknown.unwrap_err().to_string(),
            wrong.unwrap_err().to_string()
        );
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let repository = MockTestUserRepository::new();

        let mut store = MockTestSessionStore::new();
        store.expect_delete().times(2).returning(|_| Ok(()));

        let service = service(repository, store);

        assert!(service.logout("some-session").await.is_ok());
        assert!(service.logout("some-session").await.is_ok());
    }

    #[tokio::test]
    async fn test_current_identity_without_session_is_anonymous() {
        let service = service(MockTestUserRepository::new(), MockTestSessionStore::new());

        let identity = service.current_identity(None).await.unwrap();
        assert!(matches!(identity, Identity::Anonymous));
    }

    #[tokio::test]
    async fn test_current_identity_unknown_session_is_anonymous() {
        let repository = MockTestUserRepository::new();

        let mut store = MockTestSessionStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));

        let service = service(repository, store);

        let identity = service.current_identity(Some("stale")).await.unwrap();
        assert!(matches!(identity, Identity::Anonymous));
    }

    #[tokio::test]
    async fn test_current_identity_deleted_user_is_anonymous() {
        let user_id = UserId(Uuid::new_v4());

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let mut store = MockTestSessionStore::new();
        store.expect_get().times(1).returning(move |id| {
            Ok(Some(Session {
                id: id.clone(),
                user_id,
                created_at: Utc::now(),
            }))
        });

        let service = service(repository, store);

        let identity = service.current_identity(Some("dangling")).await.unwrap();
        assert!(matches!(identity, Identity::Anonymous));
    }

    #[tokio::test]
    async fn test_current_identity_live_session_is_authenticated() {
        let user = stored_user("alice@x.com", "secret1");
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        let returned = user.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let mut store = MockTestSessionStore::new();
        store.expect_get().times(1).returning(move |id| {
            Ok(Some(Session {
                id: id.clone(),
                user_id,
                created_at: Utc::now(),
            }))
        });

        let service = service(repository, store);

        let identity = service.current_identity(Some("live")).await.unwrap();
        match identity {
            Identity::Authenticated(view) => assert_eq!(view.email, "alice@x.com"),
            Identity::Anonymous => panic!("expected authenticated identity"),
        }
    }
}
