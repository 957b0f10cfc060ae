//! Day/night cycle
//!
//! Play time is split into four equal bands that repeat forever. The active
//! band scales positive time credits.

use serde::{Deserialize, Serialize};

use crate::consts::{PHASE_CYCLE_MS, PHASE_LENGTH_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Dawn,
    Day,
    Dusk,
    Night,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Dawn => "dawn",
            Phase::Day => "day",
            Phase::Dusk => "dusk",
            Phase::Night => "night",
        }
    }

    /// Multiplier applied to positive time credits
    pub fn bonus(&self) -> f64 {
        match self {
            Phase::Dawn => 1.2,
            Phase::Day => 1.0,
            Phase::Dusk => 1.0,
            Phase::Night => 0.8,
        }
    }

    /// Band for a given amount of play time
    pub fn at(elapsed_ms: u64) -> Self {
        match (elapsed_ms % PHASE_CYCLE_MS) / PHASE_LENGTH_MS {
            0 => Phase::Dawn,
            1 => Phase::Day,
            2 => Phase::Dusk,
            _ => Phase::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhaseClock {
    elapsed_ms: u64,
    current: Phase,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Bonus for credits right now. Before any play time has elapsed the
    /// cycle has not started and credits are unscaled.
    ///
    /// Only a move settled synchronously at t = 0 sees that 1.0. A `Session`
    /// settles after its settle window, by which time dawn's 1.2 applies.
    pub fn bonus(&self) -> f64 {
        if self.elapsed_ms == 0 {
            1.0
        } else {
            self.current.bonus()
        }
    }

    /// Add play time; returns the new phase when the band changed
    pub fn advance(&mut self, delta_ms: u64) -> Option<Phase> {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        let phase = Phase::at(self.elapsed_ms);
        if phase == self.current {
            return None;
        }
        self.current = phase;
        Some(phase)
    }
}
