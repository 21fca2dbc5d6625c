//! Signing key holder and credential lifetimes.
//!
//! Built once at startup (from env in `main`, directly in tests) and shared
//! read-only through `AppState`.

use std::fmt;

use jsonwebtoken::Algorithm;
use time::Duration;

use crate::config::env::{opt_var, parse_var};
use crate::error::AppError;

pub const MIN_SECRET_LEN: usize = 32;
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 30 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
pub const MAX_TTL_SECS: i64 = 366 * 24 * 60 * 60;

/// Break-glass mapping: one static token value resolves to one user id.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterBypass {
    pub token: String,
    pub user_id: i64,
}

impl fmt::Debug for MasterBypass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterBypass")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Configuration for JWT security settings
#[derive(Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub bypass: Option<MasterBypass>,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given JWT secret and default lifetimes
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            bypass: None,
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_bypass(mut self, token: impl Into<String>, user_id: i64) -> Self {
        self.bypass = Some(MasterBypass {
            token: token.into(),
            user_id,
        });
        self
    }

    /// Load from `JWT_SECRET`, `JWT_ACCESS_TTL_SECS`, `JWT_REFRESH_TTL_SECS`,
    /// `JWT_MASTER_TOKEN` and `JWT_MASTER_USER_ID`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = opt_var("JWT_SECRET")
            .ok_or_else(|| AppError::config("JWT_SECRET must be set".to_string()))?;

        let access = parse_var("JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?;
        let refresh = parse_var("JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?;

        let mut config = Self::new(secret.into_bytes())
            .with_ttls(Duration::seconds(access), Duration::seconds(refresh));

        match (opt_var("JWT_MASTER_TOKEN"), opt_var("JWT_MASTER_USER_ID")) {
            (Some(token), Some(raw_id)) => {
                let user_id = raw_id.parse::<i64>().map_err(|_| {
                    AppError::config("JWT_MASTER_USER_ID must be an integer".to_string())
                })?;
                config = config.with_bypass(token, user_id);
            }
            (None, None) => {}
            _ => {
                return Err(AppError::config(
                    "JWT_MASTER_TOKEN and JWT_MASTER_USER_ID must be set together".to_string(),
                ))
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make issuance unsafe.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AppError::config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.access_ttl <= Duration::ZERO || self.refresh_ttl <= Duration::ZERO {
            return Err(AppError::config("token lifetimes must be positive".to_string()));
        }
        let max = Duration::seconds(MAX_TTL_SECS);
        if self.access_ttl > max || self.refresh_ttl > max {
            return Err(AppError::config(format!(
                "token lifetimes must not exceed {MAX_TTL_SECS} seconds"
            )));
        }
        if let Some(bypass) = &self.bypass {
            if bypass.token.is_empty() {
                return Err(AppError::config("JWT_MASTER_TOKEN must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("bypass", &self.bypass)
            .finish()
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only_0123456789".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    fn clear() {
        for name in [
            "JWT_SECRET",
            "JWT_ACCESS_TTL_SECS",
            "JWT_REFRESH_TTL_SECS",
            "JWT_MASTER_TOKEN",
            "JWT_MASTER_USER_ID",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn from_env_applies_defaults() {
        clear();
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");

        let config = SecurityConfig::from_env().unwrap();

        assert_eq!(config.access_ttl, Duration::minutes(30));
        assert_eq!(config.refresh_ttl, Duration::days(7));
        assert!(config.bypass.is_none());
        clear();
    }

    #[test]
    #[serial]
    fn missing_or_short_secret_is_config_error() {
        clear();
        assert!(SecurityConfig::from_env().is_err());

        env::set_var("JWT_SECRET", "short");
        let err = SecurityConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("32"));
        clear();
    }

    #[test]
    #[serial]
    fn bypass_requires_both_halves() {
        clear();
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        env::set_var("JWT_MASTER_TOKEN", "break-glass");
        assert!(SecurityConfig::from_env().is_err());

        env::set_var("JWT_MASTER_USER_ID", "7");
        let config = SecurityConfig::from_env().unwrap();
        assert_eq!(config.bypass.as_ref().map(|b| b.user_id), Some(7));
        clear();
    }

    #[test]
    #[serial]
    fn oversized_lifetime_is_rejected() {
        clear();
        env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        env::set_var("JWT_REFRESH_TTL_SECS", i64::MAX.to_string());

        let err = SecurityConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
        clear();

        let at_limit = SecurityConfig::default().with_ttls(
            Duration::seconds(MAX_TTL_SECS),
            Duration::seconds(MAX_TTL_SECS),
        );
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn debug_never_prints_secret_or_master_token() {
        let config = SecurityConfig::new(b"super-secret-value-that-is-long-enough".to_vec())
            .with_bypass("master-token-value", 1);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("master-token-value"));
    }
}
