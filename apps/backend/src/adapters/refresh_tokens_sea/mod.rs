//! SeaORM adapter for persisted refresh tokens.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::refresh_tokens;

pub mod dto;

pub use dto::RefreshTokenCreate;

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RefreshTokenCreate,
) -> Result<refresh_tokens::Model, sea_orm::DbErr> {
    let active = refresh_tokens::ActiveModel {
        id: NotSet,
        token: Set(dto.token),
        user_id: Set(dto.user_id),
        expires_at: Set(dto.expires_at),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn find_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<Option<refresh_tokens::Model>, sea_orm::DbErr> {
    refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::Token.eq(token))
        .one(conn)
        .await
}

/// Returns rows affected.
pub async fn delete_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = refresh_tokens::Entity::delete_many()
        .filter(refresh_tokens::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Returns rows affected.
pub async fn delete_by_token<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    token: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = refresh_tokens::Entity::delete_many()
        .filter(refresh_tokens::Column::Token.eq(token))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    refresh_tokens::Entity::find()
        .filter(refresh_tokens::Column::UserId.eq(user_id))
        .count(conn)
        .await
}
