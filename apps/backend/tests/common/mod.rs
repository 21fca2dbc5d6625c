#![allow(dead_code)]

// tests/common/mod.rs
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{json, Value};
use townhall_backend::REFRESH_COOKIE_NAME;

// Logging is auto-installed for every test binary that includes `common`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// The `Set-Cookie` for `refreshToken` on a response, if any.
pub fn refresh_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == REFRESH_COOKIE_NAME)
        .map(|c| c.into_owned())
}

/// A cookie that clears the refresh token: empty value and zero max-age.
pub fn assert_cleared(cookie: &Cookie<'_>) {
    assert_eq!(cookie.value(), "", "cleared cookie must be empty");
    assert_eq!(
        cookie.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO),
        "cleared cookie must expire immediately"
    );
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Log in over HTTP; returns the access token and the issued refresh cookie.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> (String, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200, "login failed");

    let cookie = refresh_cookie(&resp).expect("login must set the refresh cookie");
    let body: Value = test::read_body_json(resp).await;
    let access = body["data"]["accessToken"]
        .as_str()
        .expect("accessToken in login body")
        .to_string();

    (access, cookie)
}

/// POST to the reissue route presenting `cookie` (if any).
pub async fn reissue<S, B>(app: &S, cookie: Option<Cookie<'static>>) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut req = test::TestRequest::post().uri("/api/users/token/reissue");
    if let Some(cookie) = cookie {
        req = req.cookie(cookie);
    }
    test::call_service(app, req.to_request()).await
}
