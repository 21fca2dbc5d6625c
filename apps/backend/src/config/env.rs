//! Runtime environment profile and small env-var helpers.

use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Deployment profile selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Local,
    Dev,
    Test,
    Prod,
}

impl AppEnv {
    /// Read `APP_ENV`; unset means `Local`.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("APP_ENV") {
            Ok(raw) if !raw.trim().is_empty() => raw.parse(),
            _ => Ok(Self::Local),
        }
    }

    pub fn is_prod(self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl FromStr for AppEnv {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" | "development" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(AppError::config(format!(
                "APP_ENV must be one of local, dev, test, prod (got '{other}')"
            ))),
        }
    }
}

/// Get required environment variable or return error
pub fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}

/// Optional variable; empty values count as unset.
pub fn opt_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional variable, falling back to `default` when unset.
pub fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match opt_var(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("Environment variable '{name}' has an invalid value"))),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn parses_known_profiles() {
        assert_eq!("prod".parse::<AppEnv>().unwrap(), AppEnv::Prod);
        assert_eq!(" Dev ".parse::<AppEnv>().unwrap(), AppEnv::Dev);
        assert!("staging".parse::<AppEnv>().is_err());
    }

    #[test]
    #[serial]
    fn parse_var_defaults_and_rejects_garbage() {
        env::remove_var("TOWNHALL_TEST_TTL");
        assert_eq!(parse_var("TOWNHALL_TEST_TTL", 30u64).unwrap(), 30);

        env::set_var("TOWNHALL_TEST_TTL", "45");
        assert_eq!(parse_var("TOWNHALL_TEST_TTL", 30u64).unwrap(), 45);

        env::set_var("TOWNHALL_TEST_TTL", "soon");
        assert!(parse_var("TOWNHALL_TEST_TTL", 30u64).is_err());

        env::remove_var("TOWNHALL_TEST_TTL");
    }
}
