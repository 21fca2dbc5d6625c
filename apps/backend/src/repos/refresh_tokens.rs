//! Refresh credential store.
//!
//! At most one live row per user. The session service is the only writer and
//! upholds that through `replace_for_user`; the table itself only enforces
//! token uniqueness.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::refresh_tokens_sea as tokens_adapter;
use crate::adapters::refresh_tokens_sea::RefreshTokenCreate;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl RefreshTokenRecord {
    /// Strictly before `now`: a row expiring exactly now is still live.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    pub token: String,
    pub user_id: i64,
    pub expires_at: OffsetDateTime,
}

/// Insert a row. A duplicate token string is `Conflict(UniqueToken)`.
pub async fn save<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewRefreshToken,
) -> Result<RefreshTokenRecord, DomainError> {
    let model = tokens_adapter::insert(
        conn,
        RefreshTokenCreate {
            token: new.token,
            user_id: new.user_id,
            expires_at: new.expires_at,
        },
    )
    .await
    .map_err(map_db_err)?;
    Ok(RefreshTokenRecord::from(model))
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, DomainError> {
    let model = tokens_adapter::find_by_token(conn, token)
        .await
        .map_err(map_db_err)?;
    Ok(model.map(RefreshTokenRecord::from))
}

/// Rows removed.
pub async fn delete_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, DomainError> {
    tokens_adapter::delete_by_user_id(conn, user_id)
        .await
        .map_err(map_db_err)
}

/// Rows removed. Under concurrent rotation of one token, exactly one caller
/// sees 1.
pub async fn delete_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<u64, DomainError> {
    tokens_adapter::delete_by_token(conn, token)
        .await
        .map_err(map_db_err)
}

/// Delete every row for the user, then insert `new`, on one transaction.
pub async fn replace_for_user(
    txn: &DatabaseTransaction,
    new: NewRefreshToken,
) -> Result<RefreshTokenRecord, DomainError> {
    delete_by_user_id(txn, new.user_id).await?;
    save(txn, new).await
}

pub async fn count_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, DomainError> {
    tokens_adapter::count_by_user_id(conn, user_id)
        .await
        .map_err(map_db_err)
}

impl From<crate::entities::refresh_tokens::Model> for RefreshTokenRecord {
    fn from(model: crate::entities::refresh_tokens::Model) -> Self {
        Self {
            id: model.id,
            token: model.token,
            user_id: model.user_id,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
