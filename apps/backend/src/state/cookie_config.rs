//! Refresh cookie security attributes per deployment profile.

use actix_web::cookie::SameSite;

use crate::config::env::{opt_var, AppEnv};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieConfig {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieConfig {
    /// Local/dev/test: not secure, Lax. Production: secure, None.
    pub fn for_env(app_env: AppEnv) -> Self {
        if app_env.is_prod() {
            Self {
                secure: true,
                same_site: SameSite::None,
            }
        } else {
            Self {
                secure: false,
                same_site: SameSite::Lax,
            }
        }
    }

    /// Profile defaults with `COOKIE_SECURE` / `COOKIE_SAME_SITE` overrides.
    pub fn from_env(app_env: AppEnv) -> Result<Self, AppError> {
        let mut config = Self::for_env(app_env);

        if let Some(raw) = opt_var("COOKIE_SECURE") {
            config.secure = match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(AppError::config(
                        "COOKIE_SECURE must be true or false".to_string(),
                    ))
                }
            };
        }

        if let Some(raw) = opt_var("COOKIE_SAME_SITE") {
            config.same_site = parse_same_site(&raw)?;
        }

        // Browsers drop SameSite=None cookies that are not Secure.
        if config.same_site == SameSite::None && !config.secure {
            return Err(AppError::config(
                "COOKIE_SAME_SITE=None requires COOKIE_SECURE=true".to_string(),
            ));
        }

        Ok(config)
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self::for_env(AppEnv::Local)
    }
}

fn parse_same_site(raw: &str) -> Result<SameSite, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => Ok(SameSite::None),
        _ => Err(AppError::config(
            "COOKIE_SAME_SITE must be Lax, Strict or None".to_string(),
        )),
    }
}
