use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::cookie::SessionCookieManager;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    db: Option<DatabaseConnection>,
    /// Signing key, lifetimes and the privileged bypass mapping
    pub security: SecurityConfig,
    pub cookies: SessionCookieManager,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        security: SecurityConfig,
        cookies: SessionCookieManager,
    ) -> Self {
        Self {
            db: Some(db),
            security,
            cookies,
        }
    }

    pub fn new_without_db(security: SecurityConfig, cookies: SessionCookieManager) -> Self {
        Self {
            db: None,
            security,
            cookies,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
