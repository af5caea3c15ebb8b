use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::NewUserInput;
use crate::domain::user::models::UpdateReport;
use crate::domain::user::models::UpdateUserPayload;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserStats;
use crate::domain::user::models::UserView;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Domain service for the user collection.
///
/// Owns validation, normalization, hashing, and payload sanitization; the
/// injected repository owns persistence and the authoritative unique index.
pub struct UserService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Validate one raw credential pair into a record ready for insertion.
    fn prepare(&self, email: &str, password: &str) -> Result<NewUser, UserError> {
        let email = EmailAddress::new(email.to_string())?;
        if password.is_empty() {
            return Err(UserError::MissingPassword);
        }
        let password_hash = self.password_hasher.hash(password)?;
        Ok(NewUser {
            email,
            password_hash,
        })
    }

    /// Reduce a raw update payload to the fields a client may set.
    ///
    /// Store-owned fields were already dropped by `client_fields`; what
    /// remains is validated, and a plaintext password is exchanged for its
    /// hash before anything approaches the store.
    fn sanitize(&self, payload: UpdateUserPayload) -> Result<UserChanges, UserError> {
        let (email, password) = payload.client_fields();

        let email = email
            .map(EmailAddress::new)
            .transpose()?
            .map(|e| e.as_str().to_string());

        let password_hash = password
            .map(|p| self.password_hasher.hash(&p))
            .transpose()?;

        Ok(UserChanges {
            email,
            password_hash,
        })
    }
}

#[async_trait]
impl<R> UserServicePort for UserService<R>
where
    R: UserRepository,
{
    async fn create_one(&self, email: &str, password: &str) -> Result<UserView, UserError> {
        let email = EmailAddress::new(email.to_string())?;
        if password.is_empty() {
            return Err(UserError::MissingPassword);
        }

        // Existence pre-check is an optimization only; the unique index is
        // authoritative and the insert below still maps duplicates.
        if self.repository.find_by_email(email.as_str()).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(email.as_str().to_string()));
        }

        let password_hash = self.password_hasher.hash(password)?;
        let user = self
            .repository
            .insert(NewUser {
                email,
                password_hash,
            })
            .await?;

        Ok(UserView::from(&user))
    }

    async fn create_many(&self, entries: Vec<NewUserInput>) -> Result<u64, UserError> {
        if entries.is_empty() {
            return Err(UserError::EmptyBatch);
        }

        // The whole batch must be well-formed before any hashing or store
        // call; one malformed entry rejects everything up front.
        let mut validated = Vec::with_capacity(entries.len());
        for entry in entries {
            let email = EmailAddress::new(entry.email)?;
            if entry.password.is_empty() {
                return Err(UserError::MissingPassword);
            }
            validated.push((email, entry.password));
        }

        let mut prepared = Vec::with_capacity(validated.len());
        for (email, password) in validated {
            let password_hash = self.password_hasher.hash(&password)?;
            prepared.push(NewUser {
                email,
                password_hash,
            });
        }

        let report = self.repository.insert_many(prepared).await?;

        if report.inserted < report.attempted {
            // Successful inserts stay persisted; only the duplicate-key
            // condition is surfaced.
            return Err(UserError::DuplicateEmails {
                inserted: report.inserted,
            });
        }

        Ok(report.inserted)
    }

    async fn find_all(&self) -> Result<Vec<UserView>, UserError> {
        self.repository.list_all().await
    }

    async fn find_by_query(&self, email: Option<&str>) -> Result<Vec<UserView>, UserError> {
        let filter = UserFilter {
            email: email.map(|e| e.to_string()),
        }
        .normalized();

        self.repository.find_by_query(&filter).await
    }

    async fn find_by_cursor(
        &self,
        page_size: Option<i64>,
        after: Option<&str>,
    ) -> Result<UserPage, UserError> {
        let limit = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let after_id = after.map(UserId::from_string).transpose()?;

        // Over-fetch by one to learn whether another page exists without a
        // separate count query.
        let mut items = self
            .repository
            .page_after(after_id, limit + 1)
            .await?;

        let has_more = items.len() as i64 > limit;
        if has_more {
            items.truncate(limit as usize);
        }

        let next_cursor = if has_more {
            items.last().map(|user| user.id)
        } else {
            None
        };

        Ok(UserPage { items, next_cursor })
    }

    async fn update_one(
        &self,
        id: &str,
        payload: UpdateUserPayload,
    ) -> Result<UpdateReport, UserError> {
        let id = UserId::from_string(id)?;
        let changes = self.sanitize(payload)?;

        self.repository.update_one(&id, &changes).await
    }

    async fn update_many(
        &self,
        filter: Option<UserFilter>,
        payload: Option<UpdateUserPayload>,
    ) -> Result<UpdateReport, UserError> {
        let filter = filter.ok_or(UserError::MissingFilter)?.normalized();
        let payload = payload.ok_or(UserError::MissingUpdate)?;
        let changes = self.sanitize(payload)?;

        self.repository.update_many(&filter, &changes).await
    }

    async fn replace_one(
        &self,
        id: &str,
        email: &str,
        password: &str,
    ) -> Result<UpdateReport, UserError> {
        let id = UserId::from_string(id)?;
        let replacement = self.prepare(email, password)?;

        self.repository
            .replace_one(
                &id,
                replacement.email.as_str(),
                &replacement.password_hash,
            )
            .await
    }

    async fn delete_one(&self, id: &str) -> Result<u64, UserError> {
        let id = UserId::from_string(id)?;

        self.repository.delete_one(&id).await
    }

    async fn delete_many(&self, filter: UserFilter) -> Result<u64, UserError> {
        self.repository.delete_many(&filter.normalized()).await
    }

    async fn get_stats(&self) -> Result<UserStats, UserError> {
        self.repository.stats().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::*;
    use uuid::Uuid;

    use super::*;
    use crate::domain::user::models::BulkInsert;
    use crate::domain::user::models::User;
    use crate::user::errors::EmailError;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn insert(&self, user: NewUser) -> Result<User, UserError>;
            async fn insert_many(&self, users: Vec<NewUser>) -> Result<BulkInsert, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<UserView>, UserError>;
            async fn find_by_query(&self, filter: &UserFilter) -> Result<Vec<UserView>, UserError>;
            async fn page_after(&self, after: Option<UserId>, limit: i64) -> Result<Vec<UserView>, UserError>;
            async fn update_one(&self, id: &UserId, changes: &UserChanges) -> Result<UpdateReport, UserError>;
            async fn update_many(&self, filter: &UserFilter, changes: &UserChanges) -> Result<UpdateReport, UserError>;
            async fn replace_one(&self, id: &UserId, email: &str, password_hash: &str) -> Result<UpdateReport, UserError>;
            async fn delete_one(&self, id: &UserId) -> Result<u64, UserError>;
            async fn delete_many(&self, filter: &UserFilter) -> Result<u64, UserError>;
            async fn stats(&self) -> Result<UserStats, UserError>;
        }
    }

    fn stored_user(new_user: NewUser) -> User {
        let now = Utc::now();
        User {
            id: UserId(Uuid::new_v4()),
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    fn view(id: UserId) -> UserView {
        let now = Utc::now();
        UserView {
            id,
            email: format!("user-{}@example.com", id),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_email_normalization_is_idempotent() {
        let once = EmailAddress::normalize("  Alice@X.COM ");
        let twice = EmailAddress::normalize(&once);

        assert_eq!(once, "alice@x.com");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_email_requires_domain_dot() {
        assert!(matches!(
            EmailAddress::new("alice@localhost".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
        assert!(matches!(
            EmailAddress::new("   ".to_string()),
            Err(EmailError::Missing)
        ));
    }

    #[tokio::test]
    async fn test_create_one_normalizes_and_hashes() {
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
            .returning(|user| Ok(stored_user(user)));

        let service = UserService::new(Arc::new(repository));

        let created = service.create_one("  Alice@X.COM ", "secret1").await;

        assert!(created.is_ok());
        assert_eq!(created.unwrap().email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_create_one_missing_password() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().times(0);
        repository.expect_insert().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_one("alice@x.com", "").await;
        assert!(matches!(result, Err(UserError::MissingPassword)));
    }

    #[tokio::test]
    async fn test_create_one_existing_email_is_conflict() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|email| {
                let new_user = NewUser {
                    email: EmailAddress::new(email.to_string()).unwrap(),
                    password_hash: "$argon2id$existing".to_string(),
                };
                Ok(Some(stored_user(new_user)))
            });
        repository.expect_insert().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_one("alice@x.com", "secret1").await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_one_maps_insert_race_to_conflict() {
        let mut repository = MockTestUserRepository::new();

        // Pre-check misses, but the store's unique index still answers.
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_insert()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let service = UserService::new(Arc::new(repository));

        let result = service.create_one("alice@x.com", "secret1").await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_many_rejects_empty_batch() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_insert_many().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.create_many(Vec::new()).await;
        assert!(matches!(result, Err(UserError::EmptyBatch)));
    }

    #[tokio::test]
    async fn test_create_many_rejects_batch_with_malformed_entry() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_insert_many().times(0);

        let service = UserService::new(Arc::new(repository));

        let entries = vec![
            NewUserInput {
                email: "ok@example.com".to_string(),
                password: "secret1".to_string(),
            },
            NewUserInput {
                email: "broken@example.com".to_string(),
                password: String::new(),
            },
        ];

        let result = service.create_many(entries).await;
        assert!(matches!(result, Err(UserError::MissingPassword)));
    }

    #[tokio::test]
    async fn test_create_many_reports_inserted_count() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_insert_many()
            .withf(|users| users.len() == 2)
            .times(1)
            .returning(|users| {
                Ok(BulkInsert {
                    attempted: users.len() as u64,
                    inserted: users.len() as u64,
                })
            });

        let service = UserService::new(Arc::new(repository));

        let entries = vec![
            NewUserInput {
                email: "a@example.com".to_string(),
                password: "secret1".to_string(),
            },
            NewUserInput {
                email: "b@example.com".to_string(),
                password: "secret2".to_string(),
            },
        ];

        let result = service.create_many(entries).await;
        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_many_partial_duplicates_are_conflict() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_insert_many().times(1).returning(|users| {
            Ok(BulkInsert {
                attempted: users.len() as u64,
                inserted: users.len() as u64 - 1,
            })
        });

        let service = UserService::new(Arc::new(repository));

        let entries = vec![
            NewUserInput {
                email: "a@example.com".to_string(),
                password: "secret1".to_string(),
            },
            NewUserInput {
                email: "b@example.com".to_string(),
                password: "secret2".to_string(),
            },
            NewUserInput {
                email: "a@example.com".to_string(),
                password: "secret3".to_string(),
            },
        ];

        let result = service.create_many(entries).await;
        assert!(matches!(
            result,
            Err(UserError::DuplicateEmails { inserted: 2 })
        ));
    }

    #[tokio::test]
    async fn test_find_by_cursor_trims_overfetch_and_sets_cursor() {
        let mut repository = MockTestUserRepository::new();

        // Service asks for page_size + 1; three rows back means more exist.
        repository
            .expect_page_after()
            .withf(|after, limit| after.is_none() && *limit == 3)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    view(UserId(Uuid::new_v4())),
                    view(UserId(Uuid::new_v4())),
                    view(UserId(Uuid::new_v4())),
                ])
            });

        let service = UserService::new(Arc::new(repository));

        let page = service.find_by_cursor(Some(2), None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_cursor, Some(page.items[1].id));
    }

    #[tokio::test]
    async fn test_find_by_cursor_last_page_has_no_cursor() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_page_after()
            .times(1)
            .returning(|_, _| Ok(vec![view(UserId(Uuid::new_v4()))]));

        let service = UserService::new(Arc::new(repository));

        let page = service.find_by_cursor(Some(2), None).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_find_by_cursor_defaults_and_caps_page_size() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_page_after()
            .withf(|_, limit| *limit == 11)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        repository
            .expect_page_after()
            .withf(|_, limit| *limit == 101)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = UserService::new(Arc::new(repository));

        service.find_by_cursor(None, None).await.unwrap();
        service.find_by_cursor(Some(5000), None).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_by_cursor_rejects_malformed_cursor() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_page_after().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service.find_by_cursor(Some(2), Some("not-a-uuid")).await;
        assert!(matches!(result, Err(UserError::InvalidUserId(_))));
    }

    #[tokio::test]
    async fn test_update_one_discards_store_owned_fields() {
        let mut repository = MockTestUserRepository::new();

        // The attempted password_hash/created_at overrides must vanish: with
        // no client-settable field present, the change set is empty.
        repository
            .expect_update_one()
            .withf(|_, changes| changes.is_empty())
            .times(1)
            .returning(|_, _| Ok(UpdateReport {
                matched: 1,
                modified: 0,
            }));

        let service = UserService::new(Arc::new(repository));

        let payload = UpdateUserPayload {
            password_hash: Some(serde_json::json!("hacked")),
            created_at: Some(serde_json::json!("1970-01-01T00:00:00Z")),
            id: Some(serde_json::json!("forged")),
            ..Default::default()
        };

        let report = service
            .update_one(&Uuid::new_v4().to_string(), payload)
            .await
            .unwrap();
        assert_eq!(report.matched, 1);
        assert_eq!(report.modified, 0);
    }

    #[tokio::test]
    async fn test_update_one_hashes_password_and_normalizes_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_update_one()
            .withf(|_, changes| {
                changes.email.as_deref() == Some("new@x.com")
                    && changes
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2"))
            })
            .times(1)
            .returning(|_, _| Ok(UpdateReport {
                matched: 1,
                modified: 1,
            }));

        let service = UserService::new(Arc::new(repository));

        let payload = UpdateUserPayload {
            email: Some(" New@X.com ".to_string()),
            password: Some("secret2".to_string()),
            ..Default::default()
        };

        let report = service
            .update_one(&Uuid::new_v4().to_string(), payload)
            .await
            .unwrap();
        assert_eq!(report.modified, 1);
    }

    #[tokio::test]
    async fn test_update_one_rejects_malformed_id() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_update_one().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .update_one("not-a-uuid", UpdateUserPayload::default())
            .await;
        assert!(matches!(result, Err(UserError::InvalidUserId(_))));
    }

    #[tokio::test]
    async fn test_update_many_requires_filter_and_update() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_update_many().times(0);

        let service = UserService::new(Arc::new(repository));

        let missing_filter = service
            .update_many(None, Some(UpdateUserPayload::default()))
            .await;
        assert!(matches!(missing_filter, Err(UserError::MissingFilter)));

        let missing_update = service
            .update_many(Some(UserFilter::default()), None)
            .await;
        assert!(matches!(missing_update, Err(UserError::MissingUpdate)));
    }

    #[tokio::test]
    async fn test_replace_one_requires_both_fields() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_replace_one().times(0);

        let service = UserService::new(Arc::new(repository));

        let result = service
            .replace_one(&Uuid::new_v4().to_string(), "alice@x.com", "")
            .await;
        assert!(matches!(result, Err(UserError::MissingPassword)));
    }

    #[tokio::test]
    async fn test_delete_many_zero_matches_is_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete_many()
            .times(1)
            .returning(|_| Ok(0));

        let service = UserService::new(Arc::new(repository));

        let deleted = service.delete_many(UserFilter::default()).await.unwrap();
        assert_eq!(deleted, 0);
    }
}
