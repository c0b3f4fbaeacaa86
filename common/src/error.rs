//! Error taxonomy shared across the engine.
//!
//! Every failure here is a structured, user-facing denial; nothing in the
//! scan pipeline is allowed to crash the process. Malformed scanner output
//! lines are not errors at all and never surface through this type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Target failed the syntax check. User error, never retried.
    #[error("invalid target {0:?}: expected a bare domain name or IPv4 address")]
    InvalidTarget(String),

    /// No whitelist configured at all. Fail closed, never open.
    #[error("no scan whitelist configured; set WARRANT_WHITELIST")]
    WhitelistEmpty,

    /// Target not on the whitelist. Carries the configured entries so the
    /// operator can correct the configuration.
    #[error("target {target:?} is not on the scan whitelist")]
    NotAuthorized {
        target: String,
        whitelist: Vec<String>,
    },

    /// Unknown or already-consumed confirmation token.
    #[error("confirmation token not found or already used")]
    TokenInvalid,

    /// The confirmation window closed before the token was redeemed.
    #[error("confirmation token expired")]
    TokenExpired,

    /// External scanner exceeded the configured deadline.
    #[error("scan timed out after {0}s")]
    Timeout(u64),

    /// External scanner exited non-zero or could not be spawned. The
    /// diagnostic is truncated upstream; scans are never auto-retried.
    #[error("scanner execution failed: {0}")]
    ExecutionFailed(String),
}
