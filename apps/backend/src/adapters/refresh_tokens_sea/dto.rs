use time::OffsetDateTime;

/// DTO for inserting a refresh token row.
#[derive(Debug, Clone)]
pub struct RefreshTokenCreate {
    pub token: String,
    pub user_id: i64,
    pub expires_at: OffsetDateTime,
}
