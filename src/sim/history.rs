//! Bounded rewind history and rewind charges

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::Board;
use super::hazard::HazardState;
use crate::consts::{HISTORY_DEPTH, MAX_REWIND_CHARGES};

/// Full restorable state after a completed move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub score: u64,
    pub remaining_ms: i64,
    pub hazards: HazardState,
}

/// The most recent snapshots, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStack {
    entries: VecDeque<Snapshot>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_DEPTH + 1),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > HISTORY_DEPTH {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Drop "now" and return the state one move earlier.
    /// Needs at least two entries; the returned one stays on the stack.
    pub fn step_back(&mut self) -> Option<Snapshot> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop_back();
        self.entries.back().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Why a rewind was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewindError {
    /// No run in progress
    Inactive,
    /// A move is still settling
    Busy,
    NoCharges,
    NothingToRewind,
}

impl fmt::Display for RewindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewindError::Inactive => write!(f, "no game in progress"),
            RewindError::Busy => write!(f, "a move is still settling"),
            RewindError::NoCharges => write!(f, "no rewind charges"),
            RewindError::NothingToRewind => write!(f, "nothing to rewind"),
        }
    }
}

impl std::error::Error for RewindError {}

/// Rewind credits and their passive regeneration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewindState {
    charges: u32,
    /// Progress toward the next passive charge, in [0, 1)
    progress: f64,
}

impl RewindState {
    pub fn new(charges: u32) -> Self {
        Self {
            charges,
            progress: 0.0,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Accumulate play time toward a charge. Only runs below the cap.
    /// Returns true when a charge was granted.
    pub fn regenerate(&mut self, delta_ms: u64, recharge_ms: u64) -> bool {
        if self.charges >= MAX_REWIND_CHARGES || recharge_ms == 0 {
            return false;
        }
        self.progress += delta_ms as f64 / recharge_ms as f64;
        if self.progress >= 1.0 {
            self.charges += 1;
            self.progress = 0.0;
            return true;
        }
        false
    }

    /// Milestone grant; ignores the passive cap
    pub fn grant(&mut self) {
        self.charges += 1;
    }

    pub fn consume(&mut self) -> Result<(), RewindError> {
        if self.charges == 0 {
            return Err(RewindError::NoCharges);
        }
        self.charges -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(score: u64) -> Snapshot {
        Snapshot {
            board: Board::new(),
            score,
            remaining_ms: 1000,
            hazards: HazardState::new(),
        }
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = HistoryStack::new();
        for score in 0..8 {
            history.push(snap(score));
        }
        assert_eq!(history.len(), HISTORY_DEPTH);
        assert_eq!(history.newest().map(|s| s.score), Some(7));
        let mut scores = Vec::new();
        while let Some(s) = history.step_back() {
            scores.push(s.score);
        }
        assert_eq!(scores, vec![6, 5, 4, 3]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_step_back_needs_two() {
        let mut history = HistoryStack::new();
        assert_eq!(history.step_back(), None);
        history.push(snap(1));
        assert_eq!(history.step_back(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_regeneration_caps_at_max() {
        let mut rewind = RewindState::new(1);
        assert!(!rewind.regenerate(15_000, 30_000));
        assert!((rewind.progress() - 0.5).abs() < 1e-9);
        assert!(rewind.regenerate(15_000, 30_000));
        assert_eq!(rewind.charges(), 2);
        assert_eq!(rewind.progress(), 0.0);
        assert!(rewind.regenerate(30_000, 30_000));
        assert_eq!(rewind.charges(), MAX_REWIND_CHARGES);
        assert!(!rewind.regenerate(30_000, 30_000));
        assert_eq!(rewind.progress(), 0.0);
    }

    #[test]
    fn test_milestone_grant_ignores_cap() {
        let mut rewind = RewindState::new(MAX_REWIND_CHARGES);
        rewind.grant();
        assert_eq!(rewind.charges(), MAX_REWIND_CHARGES + 1);
    }

    #[test]
    fn test_consume() {
        let mut rewind = RewindState::new(1);
        assert_eq!(rewind.consume(), Ok(()));
        assert_eq!(rewind.consume(), Err(RewindError::NoCharges));
        assert_eq!(rewind.charges(), 0);
    }
}
