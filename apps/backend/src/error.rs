use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use tracing::error;

use crate::auth::failure::AuthFailure;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::http::response::{error_response, ErrorBody};
use crate::infra::db_errors::map_db_err;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation {
        code: ErrorCode,
        detail: String,
        status: StatusCode,
    },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    /// No identity on a route that requires one
    #[error("Unauthorized")]
    Unauthorized,
    /// Wrong email or wrong password; deliberately indistinguishable
    #[error("Invalid login")]
    InvalidLogin,
    #[error("Auth failure: {0}")]
    Auth(AuthFailure),
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
    #[error("Timeout: {detail}")]
    Timeout { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::NotFound { code, .. } => *code,
            AppError::Unauthorized => ErrorCode::TokenNotFound,
            AppError::InvalidLogin => ErrorCode::InvalidLogin,
            AppError::Auth(failure) => failure.code(),
            AppError::BadRequest { code, .. } => *code,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Conflict { code, .. } => *code,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
            AppError::Timeout { .. } => ErrorCode::DbTimeout,
        }
    }

    /// Client-facing message. Server-side details stay in the logs.
    fn message(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::InvalidLogin => "Email or password is incorrect.".to_string(),
            AppError::Auth(failure) => failure.message().to_string(),
            AppError::Db { .. } | AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Server misconfiguration".to_string(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
            AppError::Timeout { .. } => "Database timeout".to_string(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { status, .. } => *status,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized | AppError::InvalidLogin | AppError::Auth(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::DbUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn invalid(code: ErrorCode, detail: String) -> Self {
        Self::Validation {
            code,
            detail,
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn internal(detail: String) -> Self {
        Self::Internal { detail }
    }

    pub fn bad_request(code: ErrorCode, detail: String) -> Self {
        Self::BadRequest { code, detail }
    }

    pub fn not_found(code: ErrorCode, detail: String) -> Self {
        Self::NotFound { code, detail }
    }

    pub fn db(detail: String) -> Self {
        Self::Db { detail }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn conflict(code: ErrorCode, detail: String) -> Self {
        Self::Conflict { code, detail }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::Auth(failure)
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => {
                let code = match kind {
                    ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
                    ValidationKind::InvalidNickname => ErrorCode::InvalidNickname,
                    ValidationKind::InvalidPassword => ErrorCode::InvalidPassword,
                    _ => ErrorCode::ValidationError,
                };
                AppError::invalid(code, detail)
            }
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
                    ConflictKind::UniqueNickname => ErrorCode::UniqueNickname,
                    ConflictKind::UniqueToken => ErrorCode::UniqueToken,
                    _ => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::User => ErrorCode::UserNotFound,
                    _ => ErrorCode::NotFound,
                };
                AppError::not_found(code, detail)
            }
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable,
                InfraErrorKind::Timeout => AppError::Timeout { detail },
                _ => AppError::db(detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e).into()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            error!(code = %self.code(), error = %self, "request failed");
        }

        let body = ErrorBody::new(self.code(), self.message());
        error_response(status, &body, None)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;

    use super::*;
    use crate::trace_ctx;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value, String) {
        let resp = trace_ctx::with_trace_id("trace-x".to_string(), async { err.error_response() }).await;
        let status = resp.status();
        let header = resp
            .headers()
            .get("x-trace-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap(), header)
    }

    #[tokio::test]
    async fn invalid_login_is_generic_401() {
        let (status, json, header) = body_json(AppError::InvalidLogin).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["code"], "INVALID_LOGIN");
        assert_eq!(json["success"], false);
        assert_eq!(json["trace_id"], header);
    }

    #[tokio::test]
    async fn internal_detail_is_not_leaked() {
        let (status, json, _) =
            body_json(AppError::internal("password column missing".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json["message"].as_str().unwrap().contains("password"));
    }

    #[tokio::test]
    async fn config_error_is_500() {
        let (status, json, _) = body_json(AppError::config("no master user".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "CONFIG_ERROR");
    }

    #[test]
    fn domain_conflicts_map_to_specific_codes() {
        let err: AppError = DomainError::conflict(ConflictKind::UniqueToken, "dup").into();
        assert_eq!(err.code(), ErrorCode::UniqueToken);
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err: AppError = DomainError::not_found(NotFoundKind::User, "gone").into();
        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }

    #[test]
    fn auth_failure_keeps_its_code() {
        let err: AppError = AuthFailure::CredentialExpired.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), ErrorCode::TokenExpired);
    }
}
