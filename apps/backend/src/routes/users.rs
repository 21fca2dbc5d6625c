//! `/api/users` endpoints: signup, session lifecycle and the caller's profile.

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

use crate::auth::failure::{translate, AuthFailure, REISSUE_PATH};
use crate::auth::SessionCookieManager;
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::http::response::ApiResponse;
use crate::logging::security;
use crate::middleware::IdentityResolve;
use crate::services::{sessions, users};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct NicknameQuery {
    pub nickname: String,
}

#[derive(Debug, Serialize)]
pub struct Availability {
    pub available: bool,
}

async fn signup(
    state: web::Data<AppState>,
    body: ValidatedJson<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let body = body.into_inner();
    let user = users::signup(
        db,
        users::SignupInput {
            email: body.email,
            password: body.password,
            nickname: body.nickname,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success("Signed up.", user)))
}

async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let result = sessions::login(
        db,
        &state.security,
        &body.email,
        &body.password,
        OffsetDateTime::now_utc(),
    )
    .await?;

    Ok(HttpResponse::Ok()
        .cookie(state.cookies.issue(&result.refresh.token))
        .json(ApiResponse::success("Logged in.", result.view)))
}

/// Rotate the refresh cookie. Credential failures end the browser session,
/// so their responses clear the cookie.
async fn reissue(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let Some(presented) = SessionCookieManager::read(&req) else {
        return Ok(reject(AuthFailure::MissingRefresh, &state));
    };

    let db = require_db(&state)?;
    match sessions::reissue(db, &state.security, Some(&presented), OffsetDateTime::now_utc()).await
    {
        Ok(result) => Ok(HttpResponse::Ok()
            .cookie(state.cookies.issue(&result.refresh.token))
            .json(ApiResponse::success("Token reissued.", result.view))),
        Err(AppError::Auth(failure)) => Ok(reject(failure, &state)),
        Err(err) => Err(err),
    }
}

fn reject(failure: AuthFailure, state: &AppState) -> HttpResponse {
    security::token_rejected(failure.code().as_str(), REISSUE_PATH);
    translate(failure, REISSUE_PATH).into_response(&state.cookies)
}

/// Revoke the presented refresh token. The cookie is cleared on every
/// outcome so a client can never get stuck holding a dead session.
async fn logout(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let presented = SessionCookieManager::read(&req);
    let clear = state.cookies.clear();

    let revoked = match require_db(&state) {
        Ok(db) => sessions::logout(db, presented.as_deref()).await,
        Err(err) => Err(err),
    };

    match revoked {
        Ok(()) => Ok(HttpResponse::Ok()
            .cookie(clear)
            .json(ApiResponse::success_empty("Logged out."))),
        Err(err) => {
            warn!(error = %err, "logout could not revoke the refresh token");
            let mut response = err.error_response();
            response
                .add_cookie(&clear)
                .map_err(|e| AppError::internal(format!("failed to attach cookie: {e}")))?;
            Ok(response)
        }
    }
}

async fn me(state: web::Data<AppState>, caller: CurrentUser) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let user = users::profile(db, caller.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("OK", user)))
}

async fn check_email(
    state: web::Data<AppState>,
    query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let available = users::email_available(db, &query.email).await?;
    Ok(availability(available))
}

async fn check_nickname(
    state: web::Data<AppState>,
    query: web::Query<NicknameQuery>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let available = users::nickname_available(db, &query.nickname).await?;
    Ok(availability(available))
}

fn availability(available: bool) -> HttpResponse {
    let message = if available { "Available." } else { "Already in use." };
    HttpResponse::build(StatusCode::OK).json(ApiResponse::success(message, Availability { available }))
}

/// Session endpoints present a refresh cookie or a password, never an access
/// token, so only `/logout` and `/me` resolve the bearer header.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .route("/token/reissue", web::post().to(reissue))
        .route("/check-email", web::get().to(check_email))
        .route("/check-nickname", web::get().to(check_nickname))
        .service(
            web::resource("/logout")
                .wrap(IdentityResolve)
                .route(web::post().to(logout)),
        )
        .service(
            web::resource("/me")
                .wrap(IdentityResolve)
                .route(web::get().to(me)),
        );
}
