mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::error_body::assert_error_body;
use serde_json::Value;
use support::{build_test_state, create_test_app, seed_user};
use futures_util::future::join;
use time::{Duration, OffsetDateTime};
use townhall_backend::auth::mint_access_token;
use townhall_backend::db::require_db;
use townhall_backend::repos::refresh_tokens::{self, NewRefreshToken};

#[actix_web::test]
async fn login_issues_access_token_and_refresh_cookie() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state.clone()).build().await;

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(serde_json::json!({ "email": user.email, "password": user.password }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = common::refresh_cookie(&resp).expect("refresh cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["code"], "SUCCESS");
    assert_eq!(body["data"]["userId"], user.id);
    assert_eq!(body["data"]["email"], user.email.as_str());
    assert_eq!(body["data"]["nickname"], user.nickname.as_str());
    assert!(body["data"]["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    // The refresh token only travels in the cookie
    assert!(body["data"].get("refreshToken").is_none());

    Ok(())
}

#[actix_web::test]
async fn second_login_invalidates_first_session() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state.clone()).build().await;

    let (_, first) = common::login(&app, &user.email, &user.password).await;
    let (_, second) = common::login(&app, &user.email, &user.password).await;
    assert_ne!(first.value(), second.value());

    let db = require_db(&state)?;
    assert_eq!(refresh_tokens::count_for_user(db, user.id).await?, 1);

    let resp = common::reissue(&app, Some(first)).await;
    let cleared = common::refresh_cookie(&resp).expect("terminal reissue clears the cookie");
    common::assert_cleared(&cleared);
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;

    let resp = common::reissue(&app, Some(second)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[actix_web::test]
async fn login_with_bad_credentials_is_uniform() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state).build().await;

    for (email, password) in [
        (user.email.as_str(), "wrong-password"),
        ("nobody@example.test", user.password.as_str()),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(serde_json::json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(common::refresh_cookie(&resp).is_none());
        assert_error_body(resp, StatusCode::UNAUTHORIZED, "INVALID_LOGIN").await;
    }

    Ok(())
}

#[actix_web::test]
async fn reissue_rotates_once_and_rejects_replay() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state.clone()).build().await;

    let (_, original) = common::login(&app, &user.email, &user.password).await;

    let resp = common::reissue(&app, Some(original.clone())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated = common::refresh_cookie(&resp).expect("rotated cookie");
    assert_ne!(rotated.value(), original.value());
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"]["accessToken"].as_str().is_some());

    let resp = common::reissue(&app, Some(original)).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;

    let db = require_db(&state)?;
    let live = refresh_tokens::find_by_token(db, rotated.value()).await?;
    assert_eq!(live.map(|r| r.user_id), Some(user.id));

    Ok(())
}

#[actix_web::test]
async fn expired_refresh_is_terminal() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let db = require_db(&state)?;

    refresh_tokens::save(
        db,
        NewRefreshToken {
            token: "expired-refresh-token".to_string(),
            user_id: user.id,
            expires_at: OffsetDateTime::now_utc() - Duration::minutes(1),
        },
    )
    .await?;

    let app = create_test_app(state.clone()).build().await;
    let cookie = state.cookies.issue("expired-refresh-token");

    let resp = common::reissue(&app, Some(cookie.clone())).await;
    common::assert_cleared(&common::refresh_cookie(&resp).expect("cleared cookie"));
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED").await;

    assert!(refresh_tokens::find_by_token(db, "expired-refresh-token")
        .await?
        .is_none());

    let resp = common::reissue(&app, Some(cookie)).await;
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;

    Ok(())
}

#[actix_web::test]
async fn reissue_without_cookie_reports_missing_refresh() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).build().await;

    let resp = common::reissue(&app, None).await;
    common::assert_cleared(&common::refresh_cookie(&resp).expect("cleared cookie"));
    assert_error_body(resp, StatusCode::UNAUTHORIZED, "REFRESH_MISSING").await;

    Ok(())
}

#[actix_web::test]
async fn stale_bearer_does_not_block_session_routes() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state.clone()).build().await;

    let expired = mint_access_token(
        user.id,
        &user.email,
        OffsetDateTime::now_utc() - Duration::hours(2),
        &state.security,
    )?;
    let (name, value) = common::bearer(&expired);

    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .insert_header((name, value.clone()))
        .set_json(serde_json::json!({ "email": user.email, "password": user.password }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let issued = common::refresh_cookie(&resp).expect("login sets the refresh cookie");

    let req = test::TestRequest::post()
        .uri("/api/users/token/reissue")
        .insert_header((name, value))
        .cookie(issued.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated = common::refresh_cookie(&resp).expect("rotated cookie");
    assert!(!rotated.value().is_empty());
    assert_ne!(rotated.value(), issued.value());

    Ok(())
}

#[actix_web::test]
async fn racing_reissues_rotate_exactly_once() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let user = seed_user(&state).await?;
    let app = create_test_app(state.clone()).build().await;

    let (_, cookie) = common::login(&app, &user.email, &user.password).await;

    let (a, b) = join(
        common::reissue(&app, Some(cookie.clone())),
        common::reissue(&app, Some(cookie)),
    )
    .await;

    let (winner, loser) = if a.status() == StatusCode::OK { (a, b) } else { (b, a) };
    assert_eq!(winner.status(), StatusCode::OK);
    let rotated = common::refresh_cookie(&winner).expect("winner gets a rotated cookie");
    assert_error_body(loser, StatusCode::UNAUTHORIZED, "TOKEN_INVALID").await;

    let db = require_db(&state)?;
    assert_eq!(refresh_tokens::count_for_user(db, user.id).await?, 1);
    assert!(refresh_tokens::find_by_token(db, rotated.value()).await?.is_some());

    Ok(())
}
