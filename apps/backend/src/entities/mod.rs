pub mod refresh_tokens;
pub mod users;

pub use refresh_tokens::Entity as RefreshTokens;
pub use refresh_tokens::Model as RefreshToken;
pub use users::Entity as Users;
pub use users::Model as User;
pub use users::UserRole;
