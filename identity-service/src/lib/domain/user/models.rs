use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;

/// User aggregate entity as stored, credential hash included.
///
/// Only the authentication path ever sees this shape; every read that leaves
/// the domain goes through [`UserView`] instead.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read model handed outward; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A record prepared for insertion: normalized email, hashed secret.
///
/// Identifier and timestamps are assigned by the store on creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: EmailAddress,
    pub password_hash: String,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Parse a user ID from its string form.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized email address value type.
///
/// Construction trims, lower-cases, and validates the `local@domain.tld`
/// shape, so two spellings of the same address always compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Canonical form of a raw email string: trimmed and lower-cased.
    ///
    /// Idempotent; applied to both stored addresses and query filters.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Create a validated, normalized email address.
    ///
    /// # Errors
    /// * `Missing` - the input is empty after trimming
    /// * `InvalidFormat` - not a parseable address, or the domain has no dot
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = Self::normalize(&email);
        if normalized.is_empty() {
            return Err(EmailError::Missing);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))?;

        // RFC-valid addresses like "a@localhost" are still rejected: the
        // domain must carry a dot.
        if !domain_of(&normalized).contains('.') {
            return Err(EmailError::InvalidFormat(
                "domain must contain a dot".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after the final `@`.
    pub fn domain(&self) -> &str {
        domain_of(&self.0)
    }
}

fn domain_of(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry of a bulk-create request.
///
/// Fields default to empty so a structurally sparse payload still
/// deserializes; emptiness is rejected as invalid input before any store
/// call is attempted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewUserInput {
    pub email: String,
    pub password: String,
}

impl Default for NewUserInput {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
        }
    }
}

/// Raw partial-update payload as received from a client.
///
/// Store-owned fields deserialize here so arbitrary payloads are accepted,
/// but [`UpdateUserPayload::client_fields`] discards them: whatever a client
/// sent for `id`, `password_hash`, `created_at`, or `updated_at` never
/// reaches a write.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub id: Option<serde_json::Value>,
    pub password_hash: Option<serde_json::Value>,
    pub created_at: Option<serde_json::Value>,
    pub updated_at: Option<serde_json::Value>,
}

impl UpdateUserPayload {
    /// The two fields a client may set: raw email and plaintext password.
    ///
    /// Empty strings count as absent, matching the behavior of a sparse
    /// payload. Everything else in the payload is dropped here.
    pub fn client_fields(self) -> (Option<String>, Option<String>) {
        let email = self.email.filter(|e| !e.trim().is_empty());
        let password = self.password.filter(|p| !p.is_empty());
        (email, password)
    }
}

/// Sanitized, ready-to-apply field set for a partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

/// Selector for bulk update/delete operations.
///
/// An empty filter matches every user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub email: Option<String>,
}

impl UserFilter {
    /// Filter with the email criterion normalized; empty criteria dropped.
    pub fn normalized(self) -> Self {
        Self {
            email: self
                .email
                .map(|e| EmailAddress::normalize(&e))
                .filter(|e| !e.is_empty()),
        }
    }
}

/// One page of a cursor walk, plus the cursor for the next page.
///
/// `next_cursor` is present iff more items exist beyond this page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    pub items: Vec<UserView>,
    pub next_cursor: Option<UserId>,
}

/// Result of an unordered bulk insert as the store reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkInsert {
    pub attempted: u64,
    pub inserted: u64,
}

/// Matched/modified counts of an update; both zero is a normal outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

/// Aggregate analytics over the user collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: u64,
    pub unique_domain_count: u64,
    pub first_user: Option<DateTime<Utc>>,
    pub last_user: Option<DateTime<Utc>>,
    pub top_domains: Vec<DomainCount>,
}

/// One row of the per-domain ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}
