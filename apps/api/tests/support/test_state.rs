use ledger_api::auth::password::PasswordHasher;
use ledger_api::config::db::{DbKind, RuntimeEnv};
use ledger_api::infra::state::build_state;
use ledger_api::state::app_state::AppState;
use ledger_api::state::security_config::SecurityConfig;

pub const TEST_SECRET: &str = "integration-test-secret-value";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET).expect("test secret is non-empty")
}

/// Fresh, migrated in-memory database per call.
pub async fn build_test_state() -> AppState {
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteMemory)
        .with_security(test_security())
        .with_hasher(PasswordHasher::for_tests().expect("test hasher"))
        .build()
        .await
        .expect("build test state")
}
