//! Session lifecycle: login, refresh rotation and logout.
//!
//! A user holds at most one live refresh token. Login replaces it, reissue
//! consumes it and stores its successor, logout deletes it. All three run on a
//! single transaction so a concurrent rotation of the same token finds zero
//! rows to delete and is rejected.

use sea_orm::{DatabaseConnection, DatabaseTransaction};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::auth::jwt::{mint_access_token, mint_refresh_token, IssuedRefresh};
use crate::auth::password::{verify_dummy, verify_password};
use crate::auth::AuthFailure;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::logging::security;
use crate::repos::refresh_tokens::{self, NewRefreshToken, RefreshTokenRecord};
use crate::repos::users;
use crate::services::users::{normalize_email, UserView};
use crate::state::security_config::SecurityConfig;

/// Body of a successful login. The refresh token travels in the cookie only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub user_id: i64,
    pub email: String,
    pub nickname: String,
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub view: LoginView,
    pub refresh: IssuedRefresh,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueView {
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct ReissueResult {
    pub view: ReissueView,
    pub refresh: IssuedRefresh,
}

/// Authenticate by email and password and start a fresh session.
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    db: &DatabaseConnection,
    security_cfg: &SecurityConfig,
    email: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<LoginResult, AppError> {
    let email = normalize_email(email);

    let Some(user) = users::find_user_by_email(db, &email).await? else {
        verify_dummy(password);
        security::login_failed("unknown_email", Some(&email));
        return Err(AppError::InvalidLogin);
    };

    if !verify_password(password, &user.password_hash)? {
        security::login_failed("bad_password", Some(&email));
        return Err(AppError::InvalidLogin);
    }

    let access_token = mint_access_token(user.id, &user.email, now, security_cfg)?;
    let refresh = mint_refresh_token(user.id, now, security_cfg)?;

    let new_row = NewRefreshToken {
        token: refresh.token.clone(),
        user_id: user.id,
        expires_at: refresh.expires_at,
    };
    with_txn(db, move |txn| {
        Box::pin(async move {
            refresh_tokens::replace_for_user(txn, new_row).await?;
            Ok(())
        })
    })
    .await?;

    info!(user_id = user.id, "login succeeded");

    let profile = UserView::from(user);
    Ok(LoginResult {
        view: LoginView {
            user_id: profile.user_id,
            email: profile.email,
            nickname: profile.nickname,
            access_token,
        },
        refresh,
    })
}

enum Rotation {
    Rotated(ReissueResult),
    Expired,
    Unknown,
}

/// Consume `presented` and issue a new access/refresh pair.
///
/// An expired token is deleted before `CredentialExpired` is returned, so a
/// retry with the same token sees `CredentialInvalid`.
pub async fn reissue(
    db: &DatabaseConnection,
    security_cfg: &SecurityConfig,
    presented: Option<&str>,
    now: OffsetDateTime,
) -> Result<ReissueResult, AppError> {
    let presented = match presented {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => return Err(AuthFailure::MissingRefresh.into()),
    };

    let security_cfg = security_cfg.clone();
    let lookup = presented.clone();
    let rotation = with_txn(db, move |txn| {
        Box::pin(async move {
            match refresh_tokens::find_by_token(txn, &lookup).await? {
                Some(record) => rotate(txn, &security_cfg, record, now).await,
                None => Ok(Rotation::Unknown),
            }
        })
    })
    .await?;

    settle(rotation, &presented)
}

/// Consume `record`, read earlier on the same transaction, and store its
/// successor.
async fn rotate(
    txn: &DatabaseTransaction,
    security_cfg: &SecurityConfig,
    record: RefreshTokenRecord,
    now: OffsetDateTime,
) -> Result<Rotation, AppError> {
    if record.is_expired(now) {
        refresh_tokens::delete_by_token(txn, &record.token).await?;
        return Ok(Rotation::Expired);
    }

    // Zero rows: a concurrent reissue consumed it first
    if refresh_tokens::delete_by_token(txn, &record.token).await? == 0 {
        return Ok(Rotation::Unknown);
    }

    let user = users::find_user_by_id(txn, record.user_id)
        .await?
        .ok_or(AuthFailure::IdentityNotFound)?;

    let access_token = mint_access_token(user.id, &user.email, now, security_cfg)?;
    let refresh = mint_refresh_token(user.id, now, security_cfg)?;
    refresh_tokens::replace_for_user(
        txn,
        NewRefreshToken {
            token: refresh.token.clone(),
            user_id: user.id,
            expires_at: refresh.expires_at,
        },
    )
    .await?;

    Ok(Rotation::Rotated(ReissueResult {
        view: ReissueView { access_token },
        refresh,
    }))
}

/// Map a committed rotation outcome to the caller's result.
fn settle(rotation: Rotation, presented: &str) -> Result<ReissueResult, AppError> {
    match rotation {
        Rotation::Rotated(result) => {
            debug!("refresh token rotated");
            Ok(result)
        }
        Rotation::Expired => Err(AuthFailure::CredentialExpired.into()),
        Rotation::Unknown => {
            security::refresh_replay(presented);
            Err(AuthFailure::CredentialInvalid.into())
        }
    }
}

/// Delete the presented refresh token if any. Repeating it is harmless.
pub async fn logout(db: &DatabaseConnection, presented: Option<&str>) -> Result<(), AppError> {
    let Some(token) = presented.filter(|t| !t.is_empty()) else {
        return Ok(());
    };

    let deleted = refresh_tokens::delete_by_token(db, token).await?;
    debug!(deleted, "logout");
    Ok(())
}
