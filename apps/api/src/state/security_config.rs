use std::env;
use std::fmt;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Token lifetime used when `JWT_TTL_SECS` is not set.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime (30 days).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Configuration for JWT security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// Shared HMAC secret for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Algorithm used when minting (always HS256)
    pub algorithm: Algorithm,
    /// Lifetime of minted tokens
    pub token_ttl: Duration,
}

impl SecurityConfig {
    /// Create a SecurityConfig with the given secret and the default TTL.
    ///
    /// An empty secret is rejected so nothing can ever sign with an empty key.
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Result<Self, AppError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.is_empty() {
            return Err(AppError::config("JWT_SECRET must not be empty"));
        }
        Ok(Self {
            jwt_secret,
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
        })
    }

    /// Replace the token lifetime; must lie in `1s..=MAX_TOKEN_TTL`.
    pub fn with_ttl(mut self, token_ttl: Duration) -> Result<Self, AppError> {
        if token_ttl.as_secs() == 0 {
            return Err(AppError::config("JWT_TTL_SECS must be positive"));
        }
        if token_ttl > MAX_TOKEN_TTL {
            return Err(AppError::config(format!(
                "JWT_TTL_SECS must be at most {} seconds",
                MAX_TOKEN_TTL.as_secs()
            )));
        }
        self.token_ttl = token_ttl;
        Ok(self)
    }

    /// Read `JWT_SECRET` (required) and `JWT_TTL_SECS` (optional).
    pub fn from_env() -> Result<Self, AppError> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::config("JWT_SECRET must be set"))?;
        let config = Self::new(secret)?;

        match env::var("JWT_TTL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| AppError::config(format!("JWT_TTL_SECS is not a number: {raw}")))?;
                config.with_ttl(Duration::from_secs(secs))
            }
            Err(_) => Ok(config),
        }
    }
}

// Keep the secret out of Debug output (and therefore out of logs).
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
