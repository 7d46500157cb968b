//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with the
//! hash. Verification is constant-time. Both operations are CPU-heavy; callers
//! on the async runtime go through [`PasswordHasher::hash_blocking`] and
//! [`PasswordHasher::verify_blocking`].

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use tokio::task;

use crate::error::AppError;

const PASSWORD_HASHING_TARGET: &str = "ledger::auth::password";

/// Password hashing and verification with Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash verified when the account does not exist, so a miss costs the
    /// same as a wrong password.
    dummy_hash: String,
}

impl PasswordHasher {
    /// OWASP parameters: 19 MiB memory, 2 iterations, 1 lane.
    pub fn new() -> Result<Self, AppError> {
        let params = Params::new(19456, 2, 1, None).map_err(|e| {
            tracing::error!(target: PASSWORD_HASHING_TARGET, error = %e, "Failed to create Argon2 parameters");
            AppError::config("Invalid password hashing configuration")
        })?;
        Self::with_params(params)
    }

    /// Minimal-cost parameters for tests.
    pub fn for_tests() -> Result<Self, AppError> {
        let params = Params::new(Params::MIN_M_COST, 1, 1, None)
            .map_err(|e| AppError::config(format!("Invalid test hashing parameters: {e}")))?;
        Self::with_params(params)
    }

    fn with_params(params: Params) -> Result<Self, AppError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(b"dummy-password-for-timing", &salt)
            .map_err(|e| AppError::internal(format!("Failed to prepare dummy hash: {e}")))?
            .to_string();
        Ok(Self { argon2, dummy_hash })
    }

    /// Hash a password with a fresh random salt, returning the PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(target: PASSWORD_HASHING_TARGET, error = %e, "Password hashing failed");
                AppError::internal("Password processing failed")
            })
    }

    /// Check a password against a stored PHC hash.
    ///
    /// `Ok(false)` for a wrong password; `Err` only when the stored hash is unreadable.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(target: PASSWORD_HASHING_TARGET, error = %e, "Stored password hash is invalid");
            AppError::internal("Password processing failed")
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(ArgonError::Password) => Ok(false),
            Err(e) => {
                tracing::error!(target: PASSWORD_HASHING_TARGET, error = %e, "Password verification failed");
                Err(AppError::internal("Password processing failed"))
            }
        }
    }

    /// Burn one verification against the dummy hash. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }

    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    /// Verify on the blocking pool; `None` for the stored hash runs the dummy check.
    pub async fn verify_blocking(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, AppError> {
        let hasher = self.clone();
        task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => Ok(hasher.verify_dummy(&password)),
        })
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
    }
}
