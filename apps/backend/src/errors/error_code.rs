//! Error codes for the Townhall backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Townhall backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Credentials
    /// Access or refresh credential is past its expiry
    TokenExpired,
    /// Credential is malformed, has a bad signature, or was already rotated
    TokenInvalid,
    /// Credential verification failed for an unexpected reason
    TokenInternal,
    /// No access credential presented on a route that requires one
    TokenNotFound,
    /// Reissue called without a refresh cookie
    RefreshMissing,
    /// Logout with an expired access credential; the cookie was cleared anyway
    LogoutDone,
    /// Wrong email or wrong password
    InvalidLogin,

    // Request Validation
    /// Invalid email address
    InvalidEmail,
    /// Invalid nickname
    InvalidNickname,
    /// Password does not meet requirements
    InvalidPassword,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// User not found
    UserNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Unique email constraint
    UniqueEmail,
    /// Unique nickname constraint
    UniqueNickname,
    /// Refresh token string collided with an existing row
    UniqueToken,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",
            Self::TokenInternal => "TOKEN_INTERNAL",
            Self::TokenNotFound => "TOKEN_NOT_FOUND",
            Self::RefreshMissing => "REFRESH_MISSING",
            Self::LogoutDone => "LOGOUT_DONE",
            Self::InvalidLogin => "INVALID_LOGIN",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidNickname => "INVALID_NICKNAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::UniqueNickname => "UNIQUE_NICKNAME",
            Self::UniqueToken => "UNIQUE_TOKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
