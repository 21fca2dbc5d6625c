#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::{CallerIdentity, SessionCookieManager, REFRESH_COOKIE_NAME};
pub use config::db::{db_url, DbKind};
pub use config::env::AppEnv;
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::CurrentUser;
pub use infra::db::connect_db;
pub use infra::state::build_state;
pub use middleware::{
    cors_middleware, IdentityResolve, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Prelude for test convenience
pub mod prelude {
    pub use super::auth::*;
    pub use super::config::db::*;
    pub use super::config::env::AppEnv;
    pub use super::error::*;
    pub use super::errors::ErrorCode;
    pub use super::extractors::*;
    pub use super::infra::state::build_state;
    pub use super::middleware::*;
    pub use super::state::*;
}

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
