use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::config::env::AppEnv;
use crate::error::AppError;

/// Connect to the configured database. Does NOT run migrations.
pub async fn connect_db(app_env: AppEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(app_env, kind)?;

    let mut options = ConnectOptions::new(database_url);
    options
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` is its own database.
    if kind == DbKind::SqliteMemory {
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    info!(?kind, "database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(app_env: AppEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(app_env, kind).await?;
    Migrator::up(&conn, None).await?;
    Ok(conn)
}
