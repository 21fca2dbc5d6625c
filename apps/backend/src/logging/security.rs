//! Security audit events. Each carries a stable `event` field for alerting.

use tracing::{error, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Login rejected; `email` is redacted.
pub fn login_failed(reason: &str, email: Option<&str>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %email.map(Redacted).unwrap_or(Redacted("")),
        reason,
        "Authentication failure"
    );
}

/// A presented credential was rejected by the identity middleware or reissue.
pub fn token_rejected(code: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        code,
        path,
        "Credential rejected"
    );
}

/// The privileged bypass token was used.
pub fn bypass_used(user_id: i64, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_BYPASS_USED",
        %trace_id,
        user_id,
        path,
        "Privileged bypass credential used"
    );
}

/// The configured bypass user does not exist. Operator action required.
pub fn bypass_misconfigured(user_id: i64) {
    let trace_id = trace_ctx::trace_id();

    error!(
        event = "SECURITY_BYPASS_MISCONFIGURED",
        %trace_id,
        user_id,
        "Privileged bypass maps to a missing user"
    );
}

/// A refresh token with no live row was presented (already rotated, revoked,
/// or lost a concurrent reissue).
pub fn refresh_replay(token: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_REFRESH_REPLAY",
        %trace_id,
        token = %Redacted(token),
        "Unknown refresh token presented"
    );
}
