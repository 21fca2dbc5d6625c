//! Credential failure conditions and their translation into responses.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use super::cookie::SessionCookieManager;
use crate::errors::ErrorCode;
use crate::http::response::{error_response, ErrorBody};

pub const LOGOUT_PATH: &str = "/api/users/logout";
pub const REISSUE_PATH: &str = "/api/users/token/reissue";

/// Per-request credential conditions raised by the identity middleware and
/// the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("credential expired")]
    CredentialExpired,
    #[error("credential invalid")]
    CredentialInvalid,
    #[error("identity not found")]
    IdentityNotFound,
    #[error("credential verification failed")]
    CredentialVerificationFailed,
    #[error("refresh credential missing")]
    MissingRefresh,
}

impl AuthFailure {
    pub fn code(self) -> ErrorCode {
        match self {
            Self::CredentialExpired => ErrorCode::TokenExpired,
            Self::CredentialInvalid => ErrorCode::TokenInvalid,
            Self::IdentityNotFound => ErrorCode::UserNotFound,
            Self::CredentialVerificationFailed => ErrorCode::TokenInternal,
            Self::MissingRefresh => ErrorCode::RefreshMissing,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::CredentialExpired => "The token has expired.",
            Self::CredentialInvalid => "The token is invalid.",
            Self::IdentityNotFound => "User not found.",
            Self::CredentialVerificationFailed => "Token verification failed.",
            Self::MissingRefresh => "Refresh token is missing.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieAction {
    Keep,
    Clear,
}

/// Status, body and cookie action for one failed request.
#[derive(Debug, Clone)]
pub struct Translation {
    pub status: StatusCode,
    pub body: ErrorBody,
    pub cookie: CookieAction,
}

impl Translation {
    pub fn into_response(self, cookies: &SessionCookieManager) -> HttpResponse {
        let cookie = match self.cookie {
            CookieAction::Clear => Some(cookies.clear()),
            CookieAction::Keep => None,
        };
        error_response(self.status, &self.body, cookie)
    }
}

/// Map a condition raised while handling `path` to its response.
///
/// Every credential condition is a 401. The logout route turns an expired
/// access credential into `LOGOUT_DONE` with a cookie clear so the client
/// cannot get stuck retrying logout. Expired or invalid refresh credentials
/// on the reissue route end the browser session, so the cookie is cleared
/// there as well.
pub fn translate(failure: AuthFailure, path: &str) -> Translation {
    let on_logout = path == LOGOUT_PATH;
    let on_reissue = path == REISSUE_PATH;

    let (code, message, cookie) = match failure {
        AuthFailure::CredentialExpired if on_logout => (
            ErrorCode::LogoutDone,
            "Logged out; the session had already expired.",
            CookieAction::Clear,
        ),
        AuthFailure::CredentialExpired | AuthFailure::CredentialInvalid if on_reissue => {
            (failure.code(), failure.message(), CookieAction::Clear)
        }
        AuthFailure::MissingRefresh => (failure.code(), failure.message(), CookieAction::Clear),
        _ => (failure.code(), failure.message(), CookieAction::Keep),
    };

    Translation {
        status: StatusCode::UNAUTHORIZED,
        body: ErrorBody::new(code, message),
        cookie,
    }
}
