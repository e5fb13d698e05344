//! Anti-replay sequence tracking.
//!
//! Each (account, lane) pair carries a strictly sequential counter starting
//! at 0. A request is accepted iff it presents exactly the expected value,
//! and acceptance advances the counter by one under the lock, so two
//! requests can never both consume the same sequence number.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::AccountError;
use crate::identity::Address;

/// Independent sequence lane within one account.
pub type LaneKey = u64;

/// The capability the state machine depends on for replay protection.
///
/// Production wiring chooses an account-owned registry (local counter) or a
/// shared `Arc<NonceRegistry>` (external nonce service); the state machine
/// does not care which.
pub trait ReplayGuard: Send + Sync {
    /// Check-and-advance: succeeds iff `presented` equals the current
    /// expected value, advancing it by exactly one. Atomic per (account, lane).
    fn increment_if_equals(
        &self,
        account: Address,
        lane: LaneKey,
        presented: u64,
    ) -> Result<(), AccountError>;

    /// The next sequence value this guard will accept.
    fn expected(&self, account: Address, lane: LaneKey) -> u64;
}

/// Mutex-guarded counter map serving both the local and the shared-service
/// deployment shapes.
#[derive(Debug, Default)]
pub struct NonceRegistry {
    cursors: Mutex<HashMap<(Address, LaneKey), u64>>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplayGuard for NonceRegistry {
    fn increment_if_equals(
        &self,
        account: Address,
        lane: LaneKey,
        presented: u64,
    ) -> Result<(), AccountError> {
        let mut cursors = self.cursors.lock().expect("nonce registry lock poisoned");
        let cursor = cursors.entry((account, lane)).or_insert(0);
        if *cursor != presented {
            return Err(AccountError::ReplaySequence {
                expected: *cursor,
                presented,
            });
        }
        *cursor += 1;
        Ok(())
    }

    fn expected(&self, account: Address, lane: LaneKey) -> u64 {
        let cursors = self.cursors.lock().expect("nonce registry lock poisoned");
        cursors.get(&(account, lane)).copied().unwrap_or(0)
    }
}
