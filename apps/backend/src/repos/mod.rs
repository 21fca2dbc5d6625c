//! Repository functions (generic over `ConnectionTrait`) returning domain
//! models and `DomainError`.

pub mod refresh_tokens;
pub mod users;
