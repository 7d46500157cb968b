use crate::auth::password::PasswordHasher;
use crate::config::db::{DbKind, RuntimeEnv};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for AppState, shared by `main` and the tests
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    security: Option<SecurityConfig>,
    hasher: Option<PasswordHasher>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: None,
            security: None,
            hasher: None,
        }
    }
    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }
    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }
    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = Some(security);
        self
    }
    pub fn with_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Unset security is read from the environment; unset hasher uses
    /// production parameters.
    pub async fn build(self) -> Result<AppState, AppError> {
        let security = match self.security {
            Some(security) => security,
            None => SecurityConfig::from_env()?,
        };
        let hasher = match self.hasher {
            Some(hasher) => hasher,
            None => PasswordHasher::new()?,
        };

        match self.db_kind {
            Some(kind) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(self.env, kind).await?;
                Ok(AppState::new(conn, security, hasher))
            }
            None => Ok(AppState::new_without_db(security, hasher)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_security() -> SecurityConfig {
        SecurityConfig::new("state-builder-secret").unwrap()
    }

    #[tokio::test]
    async fn build_without_db() {
        let state = build_state()
            .with_security(test_security())
            .with_hasher(PasswordHasher::for_tests().unwrap())
            .build()
            .await
            .unwrap();
        assert!(state.db().is_none());
    }

    #[tokio::test]
    async fn build_with_sqlite_memory_migrates() {
        let state = build_state()
            .with_env(RuntimeEnv::Test)
            .with_db(DbKind::SqliteMemory)
            .with_security(test_security())
            .with_hasher(PasswordHasher::for_tests().unwrap())
            .build()
            .await
            .unwrap();

        let db = state.db().unwrap();
        assert_eq!(migration::count_applied_migrations(db).await.unwrap(), 1);
    }
}
