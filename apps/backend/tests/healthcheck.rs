mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;
use support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_db_and_latest_migration() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-request-id").is_some());
    assert_eq!(resp.headers().get("cache-control").unwrap(), "no-store");
    assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["migrations"], "m20260301_000002_refresh_tokens");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));

    Ok(())
}
