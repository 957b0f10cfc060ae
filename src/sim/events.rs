//! Random events rolled after qualifying moves
//!
//! Each successful move past the warm-up rolls once. The roll is compared
//! against two stacked bands: `[0, good)` picks a beneficial effect,
//! `[good, good + bad)` a harmful one, and anything above fires nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::Pos;
use super::hazard;
use super::state::GameState;
use crate::consts::{EVENT_MIN_MOVES, EVENT_SCORE_BONUS, EVENT_TIME_BONUS_MS, EVENT_TIME_DRAIN_MS};
use crate::settings::DifficultyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    // Beneficial
    BonusTime,
    ClearBombs,
    Unfreeze,
    BonusTile,
    ScoreBoost,
    // Harmful
    TimeDrain,
    Bomb,
    Freeze,
    Shuffle,
    Possess,
}

impl EventKind {
    pub const GOOD: [EventKind; 5] = [
        EventKind::BonusTime,
        EventKind::ClearBombs,
        EventKind::Unfreeze,
        EventKind::BonusTile,
        EventKind::ScoreBoost,
    ];

    pub const BAD: [EventKind; 5] = [
        EventKind::TimeDrain,
        EventKind::Bomb,
        EventKind::Freeze,
        EventKind::Shuffle,
        EventKind::Possess,
    ];

    pub fn polarity(&self) -> Polarity {
        if Self::GOOD.contains(self) {
            Polarity::Good
        } else {
            Polarity::Bad
        }
    }

    /// Stable identifier for collaborators (sound/effect lookup)
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::BonusTime => "bonus_time",
            EventKind::ClearBombs => "clear_bombs",
            EventKind::Unfreeze => "unfreeze",
            EventKind::BonusTile => "bonus_tile",
            EventKind::ScoreBoost => "score_boost",
            EventKind::TimeDrain => "time_drain",
            EventKind::Bomb => "bomb",
            EventKind::Freeze => "freeze",
            EventKind::Shuffle => "shuffle",
            EventKind::Possess => "downgrade",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::BonusTime => "Borrowed Time",
            EventKind::ClearBombs => "Defused",
            EventKind::Unfreeze => "Thaw",
            EventKind::BonusTile => "Gift Tile",
            EventKind::ScoreBoost => "Hidden Stash",
            EventKind::TimeDrain => "Time Leak",
            EventKind::Bomb => "Ticking Bomb",
            EventKind::Freeze => "Cold Snap",
            EventKind::Shuffle => "Scramble",
            EventKind::Possess => "Downgrade",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EventKind::BonusTime => "+5 seconds on the clock",
            EventKind::ClearBombs => "Every bomb on the board is disarmed",
            EventKind::Unfreeze => "All frozen tiles can move again",
            EventKind::BonusTile => "An 8 tile drops onto the board",
            EventKind::ScoreBoost => "+500 points",
            EventKind::TimeDrain => "-3 seconds off the clock",
            EventKind::Bomb => "A tile will explode in 3 moves",
            EventKind::Freeze => "A tile is frozen in place",
            EventKind::Shuffle => "The tiles trade places",
            EventKind::Possess => "A tile drops back to 2",
        }
    }
}

/// An event that went off, with what it touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredEvent {
    pub kind: EventKind,
    /// Tile the effect landed on, for single-target effects
    pub target: Option<Pos>,
    /// Signed change applied to the countdown
    pub time_delta_ms: i64,
    pub score_delta: u64,
}

impl FiredEvent {
    fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            time_delta_ms: 0,
            score_delta: 0,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.kind.polarity()
    }
}

/// One draw for the move just completed. Consumes no randomness during warm-up.
pub fn roll_event<R: Rng>(
    rng: &mut R,
    config: &DifficultyConfig,
    move_count: u32,
) -> Option<EventKind> {
    if move_count < EVENT_MIN_MOVES {
        return None;
    }
    let roll: f64 = rng.random();
    if roll < config.good_event_chance {
        Some(EventKind::GOOD[rng.random_range(0..EventKind::GOOD.len())])
    } else if roll < config.good_event_chance + config.bad_event_chance {
        Some(EventKind::BAD[rng.random_range(0..EventKind::BAD.len())])
    } else {
        None
    }
}

/// Carry out an event against the game
pub fn apply_event(state: &mut GameState, kind: EventKind) -> FiredEvent {
    let mut fired = FiredEvent::new(kind);
    match kind {
        EventKind::BonusTime => {
            let bonus = state.phase_clock.bonus();
            fired.time_delta_ms = state.time.credit(EVENT_TIME_BONUS_MS as f64, bonus);
        }
        EventKind::ClearBombs => {
            state.hazards.clear_bombs();
        }
        EventKind::Unfreeze => {
            state.hazards.unfreeze_all();
        }
        EventKind::BonusTile => {
            fired.target =
                hazard::spawn_bonus_tile(&mut state.board, &mut state.hazards, &mut state.rng);
        }
        EventKind::ScoreBoost => {
            state.score += EVENT_SCORE_BONUS;
            fired.score_delta = EVENT_SCORE_BONUS;
        }
        EventKind::TimeDrain => {
            state.time.penalize(EVENT_TIME_DRAIN_MS);
            fired.time_delta_ms = -EVENT_TIME_DRAIN_MS;
        }
        EventKind::Bomb => {
            fired.target = state.hazards.spawn_bomb(&state.board, &mut state.rng);
        }
        EventKind::Freeze => {
            fired.target = state.hazards.freeze_random(&state.board, &mut state.rng);
        }
        EventKind::Shuffle => {
            hazard::shuffle(&mut state.board, &mut state.hazards, &mut state.rng);
        }
        EventKind::Possess => {
            fired.target = hazard::possess(&mut state.board, &mut state.rng);
        }
    }
    log::info!(
        "Event {:?} ({}) fired: {}",
        fired.polarity(),
        kind.tag(),
        kind.name()
    );
    fired
}
