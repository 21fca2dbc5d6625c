//! DTOs for users_sea adapter.

use crate::entities::users::UserRole;

/// DTO for creating a new user. `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub role: UserRole,
}

impl UserCreate {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            nickname: nickname.into(),
            role: UserRole::User,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}
