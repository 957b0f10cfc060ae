//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied clock readings only
//! - Seeded RNG only, owned by `GameState`
//! - Stable traversal order over the board
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod engine;
pub mod events;
pub mod grid;
pub mod hazard;
pub mod history;
pub mod lock;
pub mod phase;
pub mod state;
pub mod tick;
pub mod time_budget;

pub use autoplay::pick_direction;
pub use engine::{Merge, SlideResult, can_slide, slide};
pub use events::{EventKind, FiredEvent, Polarity, apply_event, roll_event};
pub use grid::{Board, Direction, Pos, Tile};
pub use hazard::{Explosion, HazardState};
pub use history::{HistoryStack, RewindError, RewindState, Snapshot};
pub use lock::ControlLock;
pub use phase::{Phase, PhaseClock};
pub use state::{
    GameEvent, GameOverReason, GameState, Hud, MergeBonus, MoveReport, RunStatus,
};
pub use tick::{Command, Session};
pub use time_budget::{TimeBudget, merge_time_bonus};
