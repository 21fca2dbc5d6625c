//! Token claim sets and the request-scoped caller identity.

use serde::{Deserialize, Serialize};

use super::failure::AuthFailure;

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccessClaims {
    /// User id, as a decimal string
    pub sub: String,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl AccessClaims {
    /// A validly signed token whose subject is not a user id is not a client
    /// mistake we can name, so it surfaces as a verification failure.
    pub fn user_id(&self) -> Result<i64, AuthFailure> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AuthFailure::CredentialVerificationFailed)
    }
}

/// Claims carried by a refresh token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// Random id so two tokens minted in the same second still differ
    pub jti: String,
}

/// Resolved caller for one request. Inserted into request extensions by
/// `IdentityResolve`; read through the `CurrentUser` extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: i64,
    pub email: String,
    pub nickname: String,
    pub via_bypass: bool,
}
