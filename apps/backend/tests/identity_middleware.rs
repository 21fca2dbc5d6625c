mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use support::{build_test_state, build_test_state_with, create_test_app, seed_user, test_security};
use time::{Duration, OffsetDateTime};
use townhall_backend::auth::{mint_access_token, AccessClaims};
use townhall_backend::state::security_config::SecurityConfig;

const BYPASS_TOKEN: &str = "break-glass-token-for-tests";

async fn get_me<S, B>(app: &S, auth: Option<&str>) -> actix_web::dev::ServiceResponse<B>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let mut req = test::TestRequest::get().uri("/api/users/me");
    if let Some(value) = auth {
        req = req.insert_header(("Authorization", value.to_string()));
    }
    test::call_service(app, req.to_request()).await
}

#[actix_web::test]
async fn valid_access_token_resolves_caller() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state).build().await;

    let (access, _) = common::login(&app, &user.email, &user.password).await;
    let resp = get_me(&app, Some(&format!("Bearer {access}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["userId"], user.id);
    assert_eq!(body["data"]["nickname"], user.nickname.as_str());
    assert_eq!(body["data"]["role"], "USER");
    assert!(body["data"].get("passwordHash").is_none());

    Ok(())
}

#[actix_web::test]
async fn anonymous_request_reaches_route_and_is_rejected_there(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let resp = get_me(&app, None).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_NOT_FOUND").await;

    Ok(())
}

#[actix_web::test]
async fn credential_failures_are_translated() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state).build().await;
    let now = OffsetDateTime::now_utc();
    let security = test_security();

    let expired = mint_access_token(user.id, &user.email, now - Duration::hours(2), &security)?;
    let foreign = mint_access_token(
        user.id,
        &user.email,
        now,
        &SecurityConfig::new("a-completely-different-signing-secret!".as_bytes()),
    )?;
    let ghost = mint_access_token(999_999, "ghost@example.test", now, &security)?;
    let odd_subject = encode(
        &Header::default(),
        &AccessClaims {
            sub: "not-a-number".into(),
            email: user.email.clone(),
            iat: now.unix_timestamp(),
            exp: now.unix_timestamp() + 600,
        },
        &EncodingKey::from_secret(support::test_state::TEST_SECRET.as_bytes()),
    )?;

    let cases = [
        (format!("Bearer {expired}"), "TOKEN_EXPIRED"),
        (format!("Bearer {foreign}"), "TOKEN_INVALID"),
        ("Bearer not.a.jwt".to_string(), "TOKEN_INVALID"),
        ("Basic dXNlcjpwdw==".to_string(), "TOKEN_INVALID"),
        (format!("Bearer {ghost}"), "USER_NOT_FOUND"),
        (format!("Bearer {odd_subject}"), "TOKEN_INTERNAL"),
    ];

    for (header, code) in cases {
        let resp = get_me(&app, Some(&header)).await;
        // Access failures off the session routes never touch the cookie
        assert!(common::refresh_cookie(&resp).is_none(), "{code}");
        assert_error_body(resp, StatusCode::UNAUTHORIZED, code).await;
    }

    Ok(())
}

#[actix_web::test]
async fn refresh_token_is_not_an_access_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state).build().await;

    let (_, refresh) = common::login(&app, &user.email, &user.password).await;
    let resp = get_me(&app, Some(&format!("Bearer {}", refresh.value()))).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;

    Ok(())
}

#[actix_web::test]
async fn bypass_token_resolves_configured_user() -> Result<(), Box<dyn std::error::Error>> {
    // Fresh in-memory database: the first user gets id 1
    let state = build_test_state_with(test_security().with_bypass(BYPASS_TOKEN, 1)).await?;
    let user = seed_user(&state).await?;
    assert_eq!(user.id, 1);
    let app = create_test_app(state).build().await;

    let resp = get_me(&app, Some(&format!("Bearer {BYPASS_TOKEN}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["userId"], 1);

    Ok(())
}

#[actix_web::test]
async fn bypass_to_missing_user_is_a_configuration_fault() -> Result<(), Box<dyn std::error::Error>>
{
    let state = build_test_state_with(test_security().with_bypass(BYPASS_TOKEN, 4242)).await?;
    let app = create_test_app(state).build().await;

    let resp = get_me(&app, Some(&format!("Bearer {BYPASS_TOKEN}"))).await;
    assert_error_body(resp, StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR").await;

    Ok(())
}

#[actix_web::test]
async fn error_trace_id_matches_request_id() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let resp = get_me(&app, Some("Bearer garbage")).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id");
    let body = assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;
    assert_eq!(body.trace_id, request_id);

    Ok(())
}
