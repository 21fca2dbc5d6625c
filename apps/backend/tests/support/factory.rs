use backend_test_support::unique_helpers::{unique_email, unique_nickname};
use townhall_backend::db::require_db;
use townhall_backend::services::users::{signup, SignupInput};
use townhall_backend::state::app_state::AppState;
use townhall_backend::AppError;

pub const DEFAULT_PASSWORD: &str = "correct-horse-9";

#[derive(Debug, Clone)]
pub struct SeededUser {
    pub id: i64,
    pub email: String,
    pub nickname: String,
    pub password: String,
}

/// Create a user through the signup service with unique email and nickname.
pub async fn seed_user(state: &AppState) -> Result<SeededUser, AppError> {
    let db = require_db(state)?;
    let view = signup(
        db,
        SignupInput {
            email: unique_email("user"),
            password: DEFAULT_PASSWORD.to_string(),
            nickname: unique_nickname("user"),
        },
    )
    .await?;

    Ok(SeededUser {
        id: view.user_id,
        email: view.email,
        nickname: view.nickname,
        password: DEFAULT_PASSWORD.to_string(),
    })
}
