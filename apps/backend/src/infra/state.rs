use crate::auth::cookie::SessionCookieManager;
use crate::config::db::DbKind;
use crate::config::env::AppEnv;
use crate::error::AppError;
use crate::infra::db::{bootstrap_db, connect_db};
use crate::state::app_state::AppState;
use crate::state::cookie_config::CookieConfig;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    app_env: AppEnv,
    security_config: SecurityConfig,
    cookie_config: Option<CookieConfig>,
    db_kind: Option<DbKind>,
    run_migrations: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            app_env: AppEnv::default(),
            security_config: SecurityConfig::default(),
            cookie_config: None,
            db_kind: None,
            run_migrations: false,
        }
    }

    pub fn with_env(mut self, app_env: AppEnv) -> Self {
        self.app_env = app_env;
        self
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Defaults to the profile of the configured env.
    pub fn with_cookies(mut self, cookie_config: CookieConfig) -> Self {
        self.cookie_config = Some(cookie_config);
        self
    }

    /// Run pending migrations after connecting. Always on for in-memory SQLite.
    pub fn with_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        self.security_config.validate()?;

        let cookie_config = self
            .cookie_config
            .unwrap_or_else(|| CookieConfig::for_env(self.app_env));
        let cookies = SessionCookieManager::new(cookie_config, self.security_config.refresh_ttl);

        match self.db_kind {
            Some(kind) => {
                let conn = if self.run_migrations || kind == DbKind::SqliteMemory {
                    bootstrap_db(self.app_env, kind).await?
                } else {
                    connect_db(self.app_env, kind).await?
                };
                Ok(AppState::new(conn, self.security_config, cookies))
            }
            None => Ok(AppState::new_without_db(self.security_config, cookies)),
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
