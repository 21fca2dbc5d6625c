use townhall_backend::config::db::DbKind;
use townhall_backend::config::env::AppEnv;
use townhall_backend::infra::state::build_state;
use townhall_backend::state::app_state::AppState;
use townhall_backend::state::security_config::SecurityConfig;
use townhall_backend::AppError;

pub const TEST_SECRET: &str = "integration_test_secret_0123456789abcdef";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

/// Fresh, migrated in-memory SQLite per call, so tests never share rows.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_test_state_with(test_security()).await
}

pub async fn build_test_state_with(security: SecurityConfig) -> Result<AppState, AppError> {
    build_state()
        .with_env(AppEnv::Test)
        .with_db(DbKind::SqliteMemory)
        .with_security(security)
        .build()
        .await
}
