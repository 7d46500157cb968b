use tracing::warn;
use uuid::Uuid;

use crate::logging::pii::mask_username;
use crate::trace_ctx;

/// Log a failed sign-in attempt.
pub fn login_failed(reason: &str, username: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        username = %mask_username(username),
        reason,
        "Authentication failure"
    );
}

/// Log a token that failed verification on a gated route.
pub fn token_rejected(reason: &str, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        path,
        reason,
        "Token rejected"
    );
}

/// Log a valid token used against an account it does not own.
pub fn ownership_denied(claimed: Uuid, target: Uuid, path: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_OWNERSHIP_DENIED",
        %trace_id,
        claimed_account = %claimed,
        target_account = %target,
        path,
        "Account ownership check failed"
    );
}
