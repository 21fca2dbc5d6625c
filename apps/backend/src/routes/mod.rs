use actix_web::web;

pub mod health;
pub mod users;

/// Register every route. Shared by `main` and the integration tests so both
/// exercise the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/users").configure(users::configure_routes));
}
