//! User directory operations used by signup, availability checks and `/me`.

use std::sync::LazyLock;

use regex::Regex;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::info;
use unicode_normalization::UnicodeNormalization;

use crate::adapters::users_sea::UserCreate;
use crate::auth::password::hash_password;
use crate::entities::users::UserRole;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

#[allow(clippy::unwrap_used)]
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 64;
pub const NICKNAME_MAX_CHARS: usize = 20;

/// Trim, NFKC-normalize and lowercase an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().nfkc().collect::<String>().to_lowercase()
}

pub fn validate_email(normalized: &str) -> Result<(), DomainError> {
    if normalized.len() > 320 || !EMAIL_SHAPE.is_match(normalized) {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(())
}

pub fn validate_nickname(nickname: &str) -> Result<(), DomainError> {
    let chars = nickname.chars().count();
    if chars < 2 || chars > NICKNAME_MAX_CHARS || nickname.chars().any(char::is_whitespace) {
        return Err(DomainError::validation(
            ValidationKind::InvalidNickname,
            format!("Nickname must be 2-{NICKNAME_MAX_CHARS} characters without spaces"),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPassword,
            format!("Password must be {PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters"),
        ));
    }
    Ok(())
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: i64,
    pub email: String,
    pub nickname: String,
    pub role: UserRole,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            nickname: user.nickname,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Create a user. Duplicates are reported before hashing; the unique indexes
/// still back this up against concurrent signups.
pub async fn signup<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: SignupInput,
) -> Result<UserView, AppError> {
    let email = normalize_email(&input.email);
    let nickname = input.nickname.trim().to_string();
    validate_email(&email)?;
    validate_nickname(&nickname)?;
    validate_password(&input.password)?;

    if users::email_exists(conn, &email).await? {
        return Err(DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered").into());
    }
    if users::nickname_exists(conn, &nickname).await? {
        return Err(
            DomainError::conflict(ConflictKind::UniqueNickname, "Nickname already taken").into(),
        );
    }

    let password_hash = hash_password(&input.password)?;
    let user = users::create_user(conn, UserCreate::new(email, password_hash, nickname)).await?;

    info!(user_id = user.id, email = %Redacted(&user.email), "user signed up");
    Ok(UserView::from(user))
}

pub async fn email_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, AppError> {
    let email = normalize_email(email);
    validate_email(&email)?;
    Ok(!users::email_exists(conn, &email).await?)
}

pub async fn nickname_available<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    nickname: &str,
) -> Result<bool, AppError> {
    let nickname = nickname.trim();
    validate_nickname(nickname)?;
    Ok(!users::nickname_exists(conn, nickname).await?)
}

pub async fn profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<UserView, AppError> {
    users::find_user_by_id(conn, user_id)
        .await?
        .map(UserView::from)
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found").into())
}
