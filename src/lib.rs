//! Time Rush - a 2048-style merging puzzle played against the clock
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, merges, hazards, time economy, rewind)
//! - `settings`: Difficulty presets
//! - `highscores`: Leaderboard and score ranks for finished runs

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, ScoreRank};
pub use settings::{Difficulty, DifficultyConfig};

/// Game configuration constants
pub mod consts {
    /// Board is always GRID_SIZE x GRID_SIZE
    pub const GRID_SIZE: usize = 4;

    /// Periodic tick interval driving the countdown (ms)
    pub const TICK_MS: u64 = 16;
    /// Minimum time between accepted moves (ms)
    pub const MOVE_COOLDOWN_MS: u64 = 150;
    /// How long a successful move holds the board before its deferred batch runs (ms)
    pub const SETTLE_MS: u64 = 130;

    /// Time penalty for a move that slides and merges nothing (ms)
    pub const BAD_MOVE_PENALTY_MS: i64 = 500;
    /// Time penalty per explosion (ms), never phase-scaled
    pub const EXPLOSION_PENALTY_MS: i64 = 5000;
    /// Fallback time bonus for merge values past the table (ms)
    pub const DEFAULT_TIME_BONUS_MS: f64 = 100.0;

    /// Moves a freshly planted bomb survives before detonating
    pub const BOMB_COUNTDOWN: u8 = 3;
    /// Value of the tile dropped by the bonus-tile event
    pub const BONUS_TILE_VALUE: u64 = 8;
    /// Chance a spawned tile is a 4 instead of a 2
    pub const SPAWN_FOUR_CHANCE: f64 = 0.1;
    /// Merges at or above this value count as "big" for celebratory effects
    pub const BIG_MERGE_VALUE: u64 = 64;

    /// Number of snapshots kept for rewind
    pub const HISTORY_DEPTH: usize = 5;
    /// Passive regeneration stops at this many charges
    pub const MAX_REWIND_CHARGES: u32 = 3;
    /// Charges available when a run starts
    pub const STARTING_REWIND_CHARGES: u32 = 2;
    /// Merge results that grant a bonus rewind charge
    pub const MILESTONE_VALUES: [u64; 3] = [512, 1024, 2048];

    /// Consecutive failed moves that lock input
    pub const LOCK_THRESHOLD: u32 = 3;
    /// How long input stays locked (ms)
    pub const LOCK_DURATION_MS: u64 = 3000;

    /// Random events only start after this many successful moves
    pub const EVENT_MIN_MOVES: u32 = 5;
    pub const EVENT_TIME_BONUS_MS: i64 = 5000;
    pub const EVENT_TIME_DRAIN_MS: i64 = 3000;
    pub const EVENT_SCORE_BONUS: u64 = 500;

    /// Length of a single day phase (ms)
    pub const PHASE_LENGTH_MS: u64 = 30_000;
    /// Full dawn -> day -> dusk -> night cycle (ms)
    pub const PHASE_CYCLE_MS: u64 = 4 * PHASE_LENGTH_MS;
}
