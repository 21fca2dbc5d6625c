//! User directory repository.

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users::UserRole;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub role: UserRole,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_id(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

/// `email` must already be normalized.
pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_by_email(conn, email)
        .await
        .map_err(map_db_err)?;
    Ok(user.map(User::from))
}

pub async fn email_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, DomainError> {
    let n = users_adapter::count_by_email(conn, email)
        .await
        .map_err(map_db_err)?;
    Ok(n > 0)
}

pub async fn nickname_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    nickname: &str,
) -> Result<bool, DomainError> {
    let n = users_adapter::count_by_nickname(conn, nickname)
        .await
        .map_err(map_db_err)?;
    Ok(n > 0)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: users_adapter::UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(User::from(user))
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            nickname: model.nickname,
            role: model.role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
