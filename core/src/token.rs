//! Single-use confirmation tokens.
//!
//! A token binds one authorized target to permission for one scan inside
//! a fixed time window. The registry owns all pending entries; redeeming
//! is a single check-and-remove critical section so that two concurrent
//! redeems of the same identifier can never both succeed.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use rand::RngCore;
use warrant_common::error::ScanError;
use warrant_common::target::Target;

/// Fixed confirmation window, matching the reference behavior.
pub const TOKEN_WINDOW: Duration = Duration::from_secs(5 * 60);

const TOKEN_BYTES: usize = 8;

/// Handed to the caller after a successful `validate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationToken {
    pub id: String,
    pub target: Target,
    pub expires_in: Duration,
}

struct PendingScan {
    target: Target,
    deadline: Instant,
}

pub struct TokenRegistry {
    window: Duration,
    pending: Mutex<HashMap<String, PendingScan>>,
}

impl TokenRegistry {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh token bound to `target`. Already-expired entries are
    /// purged on the way, bounded cleanup instead of a background timer.
    pub fn issue(&self, target: Target) -> ConfirmationToken {
        let id = new_token_id();
        let now = Instant::now();

        let mut pending = self.lock();
        pending.retain(|_, scan| scan.deadline > now);
        pending.insert(
            id.clone(),
            PendingScan {
                target: target.clone(),
                deadline: now + self.window,
            },
        );

        ConfirmationToken {
            id,
            target,
            expires_in: self.window,
        }
    }

    /// Checks a token without consuming it. An entry found expired is
    /// removed as a side effect.
    pub fn verify(&self, id: &str) -> Result<Target, ScanError> {
        let mut pending = self.lock();
        match pending.get(id) {
            None => Err(ScanError::TokenInvalid),
            Some(scan) if scan.deadline <= Instant::now() => {
                pending.remove(id);
                Err(ScanError::TokenExpired)
            }
            Some(scan) => Ok(scan.target.clone()),
        }
    }

    /// Removes a token unconditionally. Idempotent if already absent.
    pub fn consume(&self, id: &str) {
        self.lock().remove(id);
    }

    /// Verify-and-consume in one critical section. The scan flow uses
    /// this path; the token is gone whether or not the scan afterwards
    /// succeeds.
    pub fn redeem(&self, id: &str) -> Result<Target, ScanError> {
        let mut pending = self.lock();
        let Some(scan) = pending.remove(id) else {
            return Err(ScanError::TokenInvalid);
        };
        if scan.deadline <= Instant::now() {
            return Err(ScanError::TokenExpired);
        }
        Ok(scan.target)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PendingScan>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 8 bytes of CSPRNG entropy rendered as 16 lowercase hex characters.
fn new_token_id() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
