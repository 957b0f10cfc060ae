//! Input lock after repeated failed moves

use serde::{Deserialize, Serialize};

use crate::consts::{LOCK_DURATION_MS, LOCK_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlLock {
    consecutive_failures: u32,
    /// Clock reading at which input unlocks
    locked_until: Option<u64>,
}

impl ControlLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_locked(&self) -> bool {
        self.locked_until.is_some()
    }

    pub fn locked_until(&self) -> Option<u64> {
        self.locked_until
    }

    /// Count a failed move. Returns true when this failure engaged the lock.
    pub fn record_failure(&mut self, now_ms: u64) -> bool {
        self.consecutive_failures += 1;
        if self.consecutive_failures >= LOCK_THRESHOLD && self.locked_until.is_none() {
            self.consecutive_failures = 0;
            self.locked_until = Some(now_ms.saturating_add(LOCK_DURATION_MS));
            return true;
        }
        false
    }

    /// A successful move clears the streak, locked or not
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Release the lock once its time is up. Returns true on release.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.locked_until {
            Some(until) if now_ms >= until => {
                self.locked_until = None;
                true
            }
            _ => false,
        }
    }
}
