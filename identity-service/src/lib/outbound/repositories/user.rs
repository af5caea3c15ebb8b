use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::BulkInsert;
use crate::domain::user::models::DomainCount;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateReport;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserStats;
use crate::domain::user::models::UserView;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// PostgreSQL adapter of the user document-store contract.
///
/// The store owns id and timestamp assignment (column defaults) and the
/// authoritative unique index on email (`users_email_key`).
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_by_id(&self, id: &UserId) -> Result<u64, UserError> {
        let matched: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error("count_by_id", e))?;

        Ok(matched as u64)
    }

    async fn count_by_filter(&self, filter: &UserFilter) -> Result<u64, UserError> {
        let matched: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR email = $1)",
        )
        .bind(filter.email.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("count_by_filter", e))?;

        Ok(matched as u64)
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation_or(e, user.email.as_str(), "insert"))?;

        row.try_into()
    }

    async fn insert_many(&self, users: Vec<NewUser>) -> Result<BulkInsert, UserError> {
        let attempted = users.len() as u64;

        let mut emails = Vec::with_capacity(users.len());
        let mut hashes = Vec::with_capacity(users.len());
        for user in users {
            emails.push(user.email.as_str().to_string());
            hashes.push(user.password_hash);
        }

        // Unordered insert: duplicate-key rows are skipped, the rest land
        // and stay; rows_affected tells us how many made it.
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash)
            SELECT * FROM UNNEST($1::text[], $2::text[])
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(&emails)
        .bind(&hashes)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("insert_many", e))?;

        Ok(BulkInsert {
            attempted,
            inserted: result.rows_affected(),
        })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find_by_id", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("find_by_email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserView>, UserError> {
        let rows: Vec<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, email, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("list_all", e))?;

        Ok(rows.into_iter().map(UserView::from).collect())
    }

    async fn find_by_query(&self, filter: &UserFilter) -> Result<Vec<UserView>, UserError> {
        let rows: Vec<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, email, created_at, updated_at
            FROM users
            WHERE ($1::text IS NULL OR email = $1)
            "#,
        )
        .bind(filter.email.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("find_by_query", e))?;

        Ok(rows.into_iter().map(UserView::from).collect())
    }

    async fn page_after(
        &self,
        after: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<UserView>, UserError> {
        let rows: Vec<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, email, created_at, updated_at
            FROM users
            WHERE ($1::uuid IS NULL OR id > $1)
            ORDER BY id ASC
            LIMIT $2
            "#,
        )
        .bind(after.map(|id| id.0))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("page_after", e))?;

        Ok(rows.into_iter().map(UserView::from).collect())
    }

    async fn update_one(
        &self,
        id: &UserId,
        changes: &UserChanges,
    ) -> Result<UpdateReport, UserError> {
        let matched = self.count_by_id(id).await?;

        if changes.is_empty() {
            return Ok(UpdateReport {
                matched,
                modified: 0,
            });
        }

        // The guard keeps no-op assignments out of rows_affected, so
        // "matched but unmodified" stays observable.
        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE($2::text, email),
                password_hash = COALESCE($3::text, password_hash),
                updated_at = now()
            WHERE id = $1
              AND (($2::text IS NOT NULL AND $2::text IS DISTINCT FROM email)
                OR ($3::text IS NOT NULL AND $3::text IS DISTINCT FROM password_hash))
            "#,
        )
        .bind(id.0)
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            unique_violation_or(e, changes.email.as_deref().unwrap_or_default(), "update_one")
        })?;

        Ok(UpdateReport {
            matched,
            modified: result.rows_affected(),
        })
    }

    async fn update_many(
        &self,
        filter: &UserFilter,
        changes: &UserChanges,
    ) -> Result<UpdateReport, UserError> {
        let matched = self.count_by_filter(filter).await?;

        if changes.is_empty() {
            return Ok(UpdateReport {
                matched,
                modified: 0,
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = COALESCE($2::text, email),
                password_hash = COALESCE($3::text, password_hash),
                updated_at = now()
            WHERE ($1::text IS NULL OR email = $1)
              AND (($2::text IS NOT NULL AND $2::text IS DISTINCT FROM email)
                OR ($3::text IS NOT NULL AND $3::text IS DISTINCT FROM password_hash))
            "#,
        )
        .bind(filter.email.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            unique_violation_or(
                e,
                changes.email.as_deref().unwrap_or_default(),
                "update_many",
            )
        })?;

        Ok(UpdateReport {
            matched,
            modified: result.rows_affected(),
        })
    }

    async fn replace_one(
        &self,
        id: &UserId,
        email: &str,
        password_hash: &str,
    ) -> Result<UpdateReport, UserError> {
        let matched = self.count_by_id(id).await?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                updated_at = now()
            WHERE id = $1
              AND (email IS DISTINCT FROM $2 OR password_hash IS DISTINCT FROM $3)
            "#,
        )
        .bind(id.0)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation_or(e, email, "replace_one"))?;

        Ok(UpdateReport {
            matched,
            modified: result.rows_affected(),
        })
    }

    async fn delete_one(&self, id: &UserId) -> Result<u64, UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete_one", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_many(&self, filter: &UserFilter) -> Result<u64, UserError> {
        let result = sqlx::query("DELETE FROM users WHERE ($1::text IS NULL OR email = $1)")
            .bind(filter.email.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete_many", e))?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> Result<UserStats, UserError> {
        let (total_users, unique_domain_count, first_user, last_user): (
            i64,
            i64,
            Option<DateTime<Utc>>,
            Option<DateTime<Utc>>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(DISTINCT split_part(email, '@', 2)),
                   MIN(created_at),
                   MAX(created_at)
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error("stats", e))?;

        // Equal counts order lexicographically so the ranking is stable.
        let domains: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT split_part(email, '@', 2) AS domain, COUNT(*) AS count
            FROM users
            GROUP BY domain
            ORDER BY count DESC, domain ASC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("stats", e))?;

        Ok(UserStats {
            total_users: total_users as u64,
            unique_domain_count: unique_domain_count as u64,
            first_user,
            last_user,
            top_domains: domains
                .into_iter()
                .map(|(domain, count)| DomainCount {
                    domain,
                    count: count as u64,
                })
                .collect(),
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, UserError> {
        Ok(User {
            id: UserId(row.id),
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ViewRow {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ViewRow> for UserView {
    fn from(row: ViewRow) -> Self {
        UserView {
            id: UserId(row.id),
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn store_error(operation: &'static str, e: sqlx::Error) -> UserError {
    tracing::error!(error = %e, operation, "User store operation failed");
    UserError::DatabaseError(e.to_string())
}

fn unique_violation_or(e: sqlx::Error, email: &str, operation: &'static str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return UserError::EmailAlreadyExists(email.to_string());
        }
    }
    store_error(operation, e)
}
