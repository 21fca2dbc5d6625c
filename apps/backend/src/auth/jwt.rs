use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use super::claims::{AccessClaims, RefreshClaims};
use super::failure::AuthFailure;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// A freshly minted refresh token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedRefresh {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

fn encoding_key(security: &SecurityConfig) -> Result<EncodingKey, AppError> {
    if security.jwt_secret.is_empty() {
        return Err(AppError::config("JWT signing secret is not configured".to_string()));
    }
    Ok(EncodingKey::from_secret(&security.jwt_secret))
}

fn sign<T: serde::Serialize>(claims: &T, security: &SecurityConfig) -> Result<String, AppError> {
    encode(&Header::new(security.algorithm), claims, &encoding_key(security)?)
        .map_err(|e| AppError::config(format!("Failed to encode JWT: {e}")))
}

fn expiry(iat: i64, ttl: Duration) -> Result<i64, AppError> {
    iat.checked_add(ttl.whole_seconds())
        .ok_or_else(|| AppError::config("token lifetime overflows the expiry".to_string()))
}

/// Mint a signed access token for `user_id` valid for `security.access_ttl`.
pub fn mint_access_token(
    user_id: i64,
    email: &str,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now.unix_timestamp();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat,
        exp: expiry(iat, security.access_ttl)?,
    };

    sign(&claims, security)
}

/// Mint a signed refresh token. Persisting it is the caller's job.
pub fn mint_refresh_token(
    user_id: i64,
    now: OffsetDateTime,
    security: &SecurityConfig,
) -> Result<IssuedRefresh, AppError> {
    let iat = now.unix_timestamp();
    let exp = expiry(iat, security.refresh_ttl)?;
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    let token = sign(&claims, security)?;
    let expires_at = OffsetDateTime::from_unix_timestamp(exp)
        .map_err(|e| AppError::config(format!("refresh expiry out of range: {e}")))?;

    Ok(IssuedRefresh { token, expires_at })
}

/// Verify signature and expiry of an access token.
///
/// The configured algorithm is pinned and `exp` is checked with zero leeway.
/// Refresh tokens carry no `email` claim and therefore never verify here.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AuthFailure> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthFailure::CredentialExpired,
        _ => AuthFailure::CredentialInvalid,
    })
}
