use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Salted one-way password hasher (Argon2id).
///
/// Deliberately expensive with a fixed work factor; the cost parameters are
/// the library defaults and never adapt at runtime, so a single call is slow
/// but bounded.
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret for storage.
    ///
    /// Generates a fresh random salt per call, so hashing the same secret
    /// twice yields two different PHC strings.
    ///
    /// # Errors
    /// * `HashingFailed` - the hashing operation itself failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext secret against a stored PHC-format hash.
    ///
    /// A mismatch is a normal `false`, not an error; only a malformed stored
    /// hash produces `VerificationFailed`.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("secret1").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2"));
        assert!(hasher
            .verify("secret1", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_verify_rejects_other_password() {
        let hasher = PasswordHasher::new();

        let hash = hasher.hash("secret1").expect("Failed to hash password");

        assert!(!hasher
            .verify("secret2", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("secret1").expect("Failed to hash password");
        let second = hasher.hash("secret1").expect("Failed to hash password");

        // Fresh salt per call: same input, different PHC strings.
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_invalid_stored_hash() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify("secret1", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }
}
