//! Credential issuance, verification and the session cookie.

pub mod bypass;
pub mod claims;
pub mod cookie;
pub mod failure;
pub mod jwt;
pub mod password;

pub use claims::{AccessClaims, CallerIdentity, RefreshClaims};
pub use cookie::{SessionCookieManager, REFRESH_COOKIE_NAME};
pub use failure::{translate, AuthFailure, CookieAction, Translation};
pub use jwt::{mint_access_token, mint_refresh_token, verify_access_token, IssuedRefresh};
