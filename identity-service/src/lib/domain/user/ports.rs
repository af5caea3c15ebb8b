use async_trait::async_trait;

use crate::domain::user::models::BulkInsert;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::NewUserInput;
use crate::domain::user::models::UpdateReport;
use crate::domain::user::models::UpdateUserPayload;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserPage;
use crate::domain::user::models::UserStats;
use crate::domain::user::models::UserView;
use crate::user::errors::UserError;

/// Port for administrative operations over the user collection.
///
/// Authentication is enforced by the caller; implementations must never
/// return the password hash in any read result.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create a single user from raw credentials.
    ///
    /// Validates and normalizes the email, hashes the password, and inserts.
    ///
    /// # Errors
    /// * `InvalidEmail` / `MissingPassword` - malformed input, nothing stored
    /// * `EmailAlreadyExists` - the normalized email is taken
    /// * `DatabaseError` - store operation failed
    async fn create_one(&self, email: &str, password: &str) -> Result<UserView, UserError>;

    /// Create a batch of users with one unordered bulk insert.
    ///
    /// The whole batch is validated (and only then hashed) before any store
    /// call; per-item uniqueness failures during the insert leave the
    /// successful items persisted.
    ///
    /// # Returns
    /// Count of records actually inserted
    ///
    /// # Errors
    /// * `EmptyBatch` / `InvalidEmail` / `MissingPassword` - batch rejected
    ///   up front, nothing stored
    /// * `DuplicateEmails` - the insert observed a duplicate-key condition;
    ///   non-duplicate records remain persisted
    /// * `DatabaseError` - store operation failed
    async fn create_many(&self, entries: Vec<NewUserInput>) -> Result<u64, UserError>;

    /// All users, newest first.
    async fn find_all(&self) -> Result<Vec<UserView>, UserError>;

    /// Users matching an exact normalized email, or all when no filter given.
    async fn find_by_query(&self, email: Option<&str>) -> Result<Vec<UserView>, UserError>;

    /// One page of users ordered by ascending id, starting after a cursor.
    ///
    /// # Arguments
    /// * `page_size` - clamped to 1..=100, default 10
    /// * `after` - id of the last item of the previous page, if any
    ///
    /// # Errors
    /// * `InvalidUserId` - the cursor is not a well-formed identifier
    /// * `DatabaseError` - store operation failed
    async fn find_by_cursor(
        &self,
        page_size: Option<i64>,
        after: Option<&str>,
    ) -> Result<UserPage, UserError>;

    /// Partial update of a single user.
    ///
    /// Store-owned fields in the payload are discarded; `password` is hashed
    /// into the stored hash, `email` normalized. Matching nothing and
    /// changing nothing are both normal zero-count outcomes.
    ///
    /// # Errors
    /// * `InvalidUserId` / `InvalidEmail` - malformed input
    /// * `EmailAlreadyExists` - the new email is taken
    /// * `DatabaseError` - store operation failed
    async fn update_one(
        &self,
        id: &str,
        payload: UpdateUserPayload,
    ) -> Result<UpdateReport, UserError>;

    /// Same sanitized partial update applied to every user matching a filter.
    ///
    /// # Errors
    /// * `MissingFilter` / `MissingUpdate` - either part absent
    /// * `InvalidEmail` - malformed replacement email
    /// * `EmailAlreadyExists` - the new email is taken
    /// * `DatabaseError` - store operation failed
    async fn update_many(
        &self,
        filter: Option<UserFilter>,
        payload: Option<UpdateUserPayload>,
    ) -> Result<UpdateReport, UserError>;

    /// Full replacement of a user's content under the same identifier.
    ///
    /// # Errors
    /// * `InvalidUserId` / `InvalidEmail` / `MissingPassword` - malformed input
    /// * `EmailAlreadyExists` - the new email is taken
    /// * `DatabaseError` - store operation failed
    async fn replace_one(
        &self,
        id: &str,
        email: &str,
        password: &str,
    ) -> Result<UpdateReport, UserError>;

    /// Delete one user by id; zero deletions is success.
    async fn delete_one(&self, id: &str) -> Result<u64, UserError>;

    /// Delete every user matching a filter; zero deletions is success.
    async fn delete_many(&self, filter: UserFilter) -> Result<u64, UserError>;

    /// Aggregate analytics over the collection.
    async fn get_stats(&self) -> Result<UserStats, UserError>;
}

/// Document-store contract for the user collection.
///
/// The store owns id and timestamp assignment, per-document atomicity, and
/// the authoritative unique index on email; adapters map duplicate-key
/// conditions to `EmailAlreadyExists` rather than a generic failure.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert one prepared record.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - unique index rejected the email
    /// * `DatabaseError` - store operation failed
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;

    /// Unordered bulk insert.
    ///
    /// Duplicate-key items are skipped without aborting the rest; the report
    /// carries how many were attempted and how many landed.
    async fn insert_many(&self, users: Vec<NewUser>) -> Result<BulkInsert, UserError>;

    /// Full record by id, hash included (authentication path only).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Full record by normalized email, hash included (authentication path only).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Every user, `created_at` descending.
    async fn list_all(&self) -> Result<Vec<UserView>, UserError>;

    /// Users matching the (already normalized) filter; an empty filter
    /// matches everything.
    async fn find_by_query(&self, filter: &UserFilter) -> Result<Vec<UserView>, UserError>;

    /// Up to `limit` users with id greater than `after`, ascending by id.
    async fn page_after(
        &self,
        after: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<UserView>, UserError>;

    /// Apply a sanitized field set to one document.
    async fn update_one(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<UpdateReport, UserError>;

    /// Apply a sanitized field set to every document matching the filter.
    async fn update_many(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> Result<UpdateReport, UserError>;

    /// Replace one document's content, keeping its identifier.
    async fn replace_one(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<UpdateReport, UserError>;

    /// Delete one document; returns the deleted count (0 or 1).
    async fn delete_one(&self, id: &UserId) -> Result<u64, UserError>;

    /// Delete every document matching the filter; returns the deleted count.
    async fn delete_many(&self, filter: &UserFilter) -> Result<u64, UserError>;

    /// Aggregation over the collection: totals plus per-domain ranking.
    async fn stats(&self) -> Result<UserStats, UserError>;
}
