//! Password value object.
//!
//! Hashing and verification with Argon2. Plaintext never leaves this module.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash of a throwaway password, verified against when a login names an
/// unknown email so both paths spend the same time hashing.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| Password::hash("estate-dummy-password").ok());

/// Argon2 password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// `MIN_PASSWORD_LENGTH` characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from the database.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Burn one verification so unknown-email logins are not distinguishable
    /// by response time. Always returns false.
    pub fn verify_dummy(plain_text: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = Self::verify_hash(plain_text, hash);
        }
        false
    }

    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}
