use std::env;

use super::env::{must_var, opt_var, AppEnv};
use crate::error::AppError;

/// Which database engine a connection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl DbKind {
    /// Read `DB_KIND`; unset means Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        match opt_var("DB_KIND") {
            None => Ok(Self::Postgres),
            Some(raw) => raw.parse(),
        }
    }
}

impl std::str::FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite-file" | "sqlite" => Ok(Self::SqliteFile),
            "sqlite-memory" => Ok(Self::SqliteMemory),
            other => Err(AppError::config(format!(
                "DB_KIND must be postgres, sqlite-file or sqlite-memory (got '{other}')"
            ))),
        }
    }
}

/// Builds a database URL for the given profile and engine.
///
/// `DATABASE_URL` wins for file-backed engines; otherwise the Postgres URL is
/// assembled from `POSTGRES_*`, `PROD_DB`/`TEST_DB` and `APP_DB_*`.
pub fn db_url(app_env: AppEnv, kind: DbKind) -> Result<String, AppError> {
    match kind {
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
        DbKind::SqliteFile => {
            if let Some(url) = opt_var("DATABASE_URL") {
                return Ok(url);
            }
            let path = opt_var("SQLITE_DB_PATH").unwrap_or_else(|| "townhall.sqlite".to_string());
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::Postgres => {
            if let Some(url) = opt_var("DATABASE_URL") {
                return Ok(url);
            }
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = db_name(app_env)?;
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;

            Ok(format!("postgresql://{username}:{password}@{host}:{port}/{db_name}"))
        }
    }
}

fn db_name(app_env: AppEnv) -> Result<String, AppError> {
    match app_env {
        AppEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            // Enforce safety: test DB must end with "_test"
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
        AppEnv::Local | AppEnv::Dev | AppEnv::Prod => must_var("PROD_DB"),
    }
}
