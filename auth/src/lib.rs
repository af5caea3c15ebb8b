//! Credential verification library
//!
//! Provides the password-hashing primitive shared by services: a slow,
//! salted one-way hash (Argon2id) with a fixed work factor. Plaintext
//! secrets only ever exist transiently on the way into `hash` or `verify`
//! and are never persisted or logged.
//!
//! # Examples
//!
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```

pub mod password;

pub use password::PasswordError;
pub use password::PasswordHasher;
