use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use townhall_backend::config::db::DbKind;
use townhall_backend::config::env::AppEnv;
use townhall_backend::infra::db::connect_db;

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

/// In-memory SQLite is not offered: it would vanish when the command exits.
#[derive(Clone, Copy, ValueEnum)]
enum Db {
    Postgres,
    SqliteFile,
}

#[derive(Parser)]
#[command(name = "migration")]
#[command(about = "Townhall database migration tool")]
struct Args {
    /// up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Selects PROD_DB or TEST_DB when DATABASE_URL is unset
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,

    #[arg(short, long, value_enum, default_value = "postgres")]
    db: Db,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let app_env = match args.env {
        Env::Prod => AppEnv::Prod,
        Env::Test => AppEnv::Test,
    };
    let kind = match args.db {
        Db::Postgres => DbKind::Postgres,
        Db::SqliteFile => DbKind::SqliteFile,
    };

    let db = match connect_db(app_env, kind).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Could not connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}
