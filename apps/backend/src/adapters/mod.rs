//! SeaORM adapters. Functions return `DbErr`; the repos layer maps it to
//! `DomainError`.

pub mod refresh_tokens_sea;
pub mod users_sea;
