use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::password::PasswordHasher;

/// Shared, read-only resources handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent in some unit tests)
    db: Option<DatabaseConnection>,
    /// JWT settings, built once at startup
    pub security: SecurityConfig,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, hasher: PasswordHasher) -> Self {
        Self {
            db: Some(db),
            security,
            hasher,
        }
    }

    pub fn new_without_db(security: SecurityConfig, hasher: PasswordHasher) -> Self {
        Self {
            db: None,
            security,
            hasher,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
