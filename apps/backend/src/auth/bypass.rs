//! Privileged bypass: one configured token value maps to one user id and
//! skips signature and expiry checks.

use subtle::ConstantTimeEq;

use crate::state::security_config::SecurityConfig;

/// The mapped user id when `token` is the configured master token.
pub fn resolve_bypass(token: &str, security: &SecurityConfig) -> Option<i64> {
    let bypass = security.bypass.as_ref()?;
    let matches: bool = token.as_bytes().ct_eq(bypass.token.as_bytes()).into();
    matches.then_some(bypass.user_id)
}
