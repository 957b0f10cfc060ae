//! Countdown resource
//!
//! Remaining time is kept in whole milliseconds and clamped to `[0, max]`.
//! Positive credits are scaled by the current phase bonus; penalties never are.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_TIME_BONUS_MS;

/// Base reward per merge result, before the difficulty multiplier
const TIME_BONUS_TABLE: [(u64, f64); 10] = [
    (4, 200.0),
    (8, 350.0),
    (16, 500.0),
    (32, 750.0),
    (64, 1000.0),
    (128, 1500.0),
    (256, 2000.0),
    (512, 3000.0),
    (1024, 4500.0),
    (2048, 6000.0),
];

/// Time reward for producing `merged_value`, scaled by the difficulty multiplier
pub fn merge_time_bonus(merged_value: u64, multiplier: f64) -> f64 {
    let base = TIME_BONUS_TABLE
        .iter()
        .find(|(value, _)| *value == merged_value)
        .map(|(_, ms)| *ms)
        .unwrap_or(DEFAULT_TIME_BONUS_MS);
    base * multiplier
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBudget {
    remaining_ms: i64,
    max_ms: i64,
    /// Set once the countdown has hit zero and game over was signalled
    expired: bool,
}

impl TimeBudget {
    pub fn new(start_ms: i64, max_ms: i64) -> Self {
        Self {
            remaining_ms: start_ms.clamp(0, max_ms),
            max_ms,
            expired: false,
        }
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    pub fn max_ms(&self) -> i64 {
        self.max_ms
    }

    /// Remaining time as a fraction of the ceiling, for timer bars
    pub fn fraction(&self) -> f64 {
        if self.max_ms <= 0 {
            return 0.0;
        }
        self.remaining_ms as f64 / self.max_ms as f64
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Add (or with a negative amount, remove) time.
    ///
    /// Returns the signed amount requested after phase scaling and rounding,
    /// which may differ from what the clamp actually let through.
    pub fn credit(&mut self, ms: f64, phase_bonus: f64) -> i64 {
        let scaled = if ms > 0.0 { ms * phase_bonus } else { ms };
        let delta = scaled.round() as i64;
        self.remaining_ms = (self.remaining_ms + delta).clamp(0, self.max_ms);
        delta
    }

    /// Flat deduction, never phase-scaled
    pub fn penalize(&mut self, ms: i64) {
        self.credit(-(ms.abs() as f64), 1.0);
    }

    /// Count down by `delta_ms`. Returns true exactly once: on the tick that
    /// finds the countdown at zero.
    pub fn tick(&mut self, delta_ms: u64) -> bool {
        let delta = i64::try_from(delta_ms).unwrap_or(i64::MAX);
        self.remaining_ms = self.remaining_ms.saturating_sub(delta).max(0);
        if self.remaining_ms == 0 && !self.expired {
            self.expired = true;
            return true;
        }
        false
    }

    /// Overwrite the countdown from a snapshot
    pub fn restore(&mut self, remaining_ms: i64) {
        self.remaining_ms = remaining_ms.clamp(0, self.max_ms);
        if self.remaining_ms > 0 {
            self.expired = false;
        }
    }
}
