use actix_web::{web, App, HttpServer};
use townhall_backend::config::db::DbKind;
use townhall_backend::config::env::{parse_var, AppEnv};
use townhall_backend::infra::state::build_state;
use townhall_backend::logging::security;
use townhall_backend::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use townhall_backend::repos::users;
use townhall_backend::routes;
use townhall_backend::state::{CookieConfig, SecurityConfig};

mod telemetry;

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {message}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables come from the runtime (docker env_file, or a
    // sourced .env for local runs); nothing is read from disk here.
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = parse_var::<u16>("BACKEND_PORT", 8080).unwrap_or_else(|e| exit_with(e));

    let app_env = AppEnv::from_env().unwrap_or_else(|e| exit_with(e));
    let db_kind = DbKind::from_env().unwrap_or_else(|e| exit_with(e));
    let security = SecurityConfig::from_env().unwrap_or_else(|e| exit_with(e));
    let cookies = CookieConfig::from_env(app_env).unwrap_or_else(|e| exit_with(e));

    println!("🚀 Starting Townhall backend ({app_env:?}) on http://{host}:{port}");

    // Postgres schemas are owned by the migration CLI; SQLite migrates itself
    let app_state = build_state()
        .with_env(app_env)
        .with_db(db_kind)
        .with_security(security)
        .with_cookies(cookies)
        .with_migrations(db_kind != DbKind::Postgres)
        .build()
        .await
        .unwrap_or_else(|e| exit_with(format!("Failed to build application state: {e}")));

    println!("✅ Database connected ({db_kind:?})");

    // A fresh database has no users yet, so this only warns; requests using
    // the bypass still fail with CONFIG_ERROR until the user exists.
    if let (Some(bypass), Some(db)) = (&app_state.security.bypass, app_state.db()) {
        match users::find_user_by_id(db, bypass.user_id).await {
            Ok(Some(_)) => {}
            Ok(None) => security::bypass_misconfigured(bypass.user_id),
            Err(e) => exit_with(format!("Failed to check bypass user: {e}")),
        }
    }

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        // Last wrap is outermost: RequestTrace sees the request first
        App::new()
            .wrap(SecurityHeaders)
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
