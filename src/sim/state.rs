//! Game state and core simulation types
//!
//! `GameState` owns everything a run needs, including its RNG, so the same
//! seed and the same command sequence always produce the same game.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::engine::{self, SlideResult};
use super::events::{FiredEvent, apply_event, roll_event};
use super::grid::{Board, Direction, Pos, Tile};
use super::hazard::{self, Explosion, HazardState};
use super::history::{HistoryStack, RewindError, RewindState, Snapshot};
use super::lock::ControlLock;
use super::phase::{Phase, PhaseClock};
use super::time_budget::{TimeBudget, merge_time_bonus};
use crate::consts::*;
use crate::settings::{Difficulty, DifficultyConfig};

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// No run in progress (before start, or after quitting to the menu)
    Idle,
    Playing,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Countdown reached zero
    TimeUp,
    /// Board full with no merge available
    Stuck,
}

/// A merge as reported once its time bonus has been paid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeBonus {
    pub value: u64,
    pub pos: Pos,
    /// Milliseconds actually credited (after multiplier and phase bonus)
    pub time_bonus_ms: i64,
    /// Large enough to deserve a celebration
    pub big: bool,
}

/// Everything a completed move did, for effect sequencing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub direction: Direction,
    pub merges: Vec<MergeBonus>,
    /// Merge-triggered blasts first, then countdown blasts
    pub explosions: Vec<Explosion>,
    pub spawned: Option<Tile>,
    pub event: Option<FiredEvent>,
    pub score_gained: u64,
    /// Rewind charges earned from milestone merges
    pub charges_granted: u32,
    pub game_over: bool,
}

/// Notifications for rendering, audio and persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Slide/merge pass finished; deferred effects still pending
    Slid(SlideResult),
    /// Deferred batch for a move has run
    Moved(MoveReport),
    BadMove {
        direction: Direction,
        penalty_ms: i64,
        consecutive_failures: u32,
    },
    EventFired(FiredEvent),
    PhaseChanged {
        phase: Phase,
        bonus: f64,
    },
    Rewound {
        charges_remaining: u32,
    },
    RewindFailed(RewindError),
    RewindCharged {
        charges: u32,
    },
    LockEngaged {
        until_ms: u64,
    },
    LockReleased,
    GameOver {
        score: u64,
        moves: u32,
        reason: GameOverReason,
    },
}

/// Display state, cheap to query every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub moves: u32,
    pub remaining_ms: i64,
    pub max_ms: i64,
    pub time_fraction: f64,
    pub rewind_charges: u32,
    pub rewind_progress: f64,
    pub phase: Phase,
    pub locked: bool,
    pub best_tile: Option<u64>,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub difficulty: Difficulty,
    /// Tuning for this run, fixed at start
    pub config: DifficultyConfig,
    pub status: RunStatus,
    pub board: Board,
    pub hazards: HazardState,
    pub score: u64,
    /// Successful moves so far
    pub move_count: u32,
    pub time: TimeBudget,
    pub phase_clock: PhaseClock,
    pub history: HistoryStack,
    pub rewind: RewindState,
    pub lock: ControlLock,
    /// Every random draw in the run comes from here
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Start a run: two random tiles and an initial snapshot
    pub fn new(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(difficulty, Pcg32::seed_from_u64(seed))
    }

    /// Start a run with an explicit random source
    pub fn with_rng(difficulty: Difficulty, rng: Pcg32) -> Self {
        let mut state = Self::idle(difficulty, rng);
        state.spawn_random_tile();
        state.spawn_random_tile();
        state.begin();
        state
    }

    /// Start a run from a prepared board (no random opening tiles)
    pub fn with_board(difficulty: Difficulty, seed: u64, board: Board) -> Self {
        let mut state = Self::idle(difficulty, Pcg32::seed_from_u64(seed));
        state.board = board;
        state.begin();
        state
    }

    fn idle(difficulty: Difficulty, rng: Pcg32) -> Self {
        let config = difficulty.config();
        Self {
            difficulty,
            config,
            status: RunStatus::Idle,
            board: Board::new(),
            hazards: HazardState::new(),
            score: 0,
            move_count: 0,
            time: TimeBudget::new(config.start_time_ms, config.max_time_ms),
            phase_clock: PhaseClock::new(),
            history: HistoryStack::new(),
            rewind: RewindState::new(STARTING_REWIND_CHARGES),
            lock: ControlLock::new(),
            rng,
        }
    }

    fn begin(&mut self) {
        self.status = RunStatus::Playing;
        self.history.clear();
        self.record_snapshot();
        log::info!(
            "Run started on {} ({} tiles, {}ms on the clock)",
            self.difficulty.as_str(),
            self.board.tile_count(),
            self.time.remaining_ms()
        );
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Playing
    }

    /// Drop a 2 (or occasionally a 4) on a random empty cell
    pub fn spawn_random_tile(&mut self) -> Option<Tile> {
        let empty = self.board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let pos = empty[self.rng.random_range(0..empty.len())];
        let roll: f64 = self.rng.random();
        let value = if roll < 1.0 - SPAWN_FOUR_CHANCE { 2 } else { 4 };
        self.board.place(pos, value);
        self.hazards.clear_at(pos);
        Some(Tile {
            row: pos.row,
            col: pos.col,
            value,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            score: self.score,
            remaining_ms: self.time.remaining_ms(),
            hazards: self.hazards,
        }
    }

    pub fn record_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Slide/merge pass plus its immediate bookkeeping.
    ///
    /// Score, move count and blast penalties land now; time bonuses, bomb
    /// countdowns, the new tile, events and the snapshot wait for `settle`.
    pub fn slide(&mut self, direction: Direction) -> SlideResult {
        let result = engine::slide(&mut self.board, &mut self.hazards, direction);
        if result.moved {
            self.move_count += 1;
            self.score += result.merge_score();
            self.lock.record_success();
            for _ in &result.explosions {
                self.time.penalize(EXPLOSION_PENALTY_MS);
            }
        }
        result
    }

    /// Deferred batch for a successful slide
    pub fn settle(&mut self, slide: SlideResult) -> Vec<GameEvent> {
        let score_gained = slide.merge_score();
        let phase_bonus = self.phase_clock.bonus();

        let mut merges = Vec::with_capacity(slide.merges.len());
        let mut charges_granted = 0;
        for merge in &slide.merges {
            let base = merge_time_bonus(merge.value, self.config.time_multiplier);
            let credited = self.time.credit(base, phase_bonus);
            if MILESTONE_VALUES.contains(&merge.value) {
                self.rewind.grant();
                charges_granted += 1;
            }
            merges.push(MergeBonus {
                value: merge.value,
                pos: merge.pos,
                time_bonus_ms: credited,
                big: merge.value >= BIG_MERGE_VALUE,
            });
        }

        let mut explosions = slide.explosions;
        for center in self.hazards.tick_bombs() {
            explosions.push(hazard::explode(&mut self.board, &mut self.hazards, center));
            self.time.penalize(EXPLOSION_PENALTY_MS);
        }

        let spawned = self.spawn_random_tile();
        let event = roll_event(&mut self.rng, &self.config, self.move_count)
            .map(|kind| apply_event(self, kind));

        self.record_snapshot();

        let stuck = self.board.is_stuck();
        let report = MoveReport {
            direction: slide.direction,
            merges,
            explosions,
            spawned,
            event,
            score_gained,
            charges_granted,
            game_over: stuck,
        };
        log::debug!(
            "Move {} settled: {} merges, {} explosions, score {}",
            self.move_count,
            report.merges.len(),
            report.explosions.len(),
            self.score
        );

        let mut events = vec![GameEvent::Moved(report)];
        if let Some(fired) = event {
            events.push(GameEvent::EventFired(fired));
        }
        if stuck {
            events.push(self.end(GameOverReason::Stuck));
        }
        events
    }

    /// A direction that moved nothing: time penalty and a strike toward the lock
    pub fn fail_move(&mut self, direction: Direction, now_ms: u64) -> Vec<GameEvent> {
        self.time.penalize(BAD_MOVE_PENALTY_MS);
        let streak = self.lock.consecutive_failures() + 1;
        let mut events = vec![GameEvent::BadMove {
            direction,
            penalty_ms: BAD_MOVE_PENALTY_MS,
            consecutive_failures: streak,
        }];
        if self.lock.record_failure(now_ms) {
            let until_ms = self.lock.locked_until().unwrap_or(now_ms);
            log::info!("Input locked until {until_ms}ms after {streak} failed moves");
            events.push(GameEvent::LockEngaged { until_ms });
        }
        events
    }

    /// Lift an expired input lock
    pub fn release_lock(&mut self, now_ms: u64) -> Option<GameEvent> {
        if !self.is_active() || !self.lock.poll(now_ms) {
            return None;
        }
        log::info!("Input unlocked");
        Some(GameEvent::LockReleased)
    }

    /// Slide and settle in one go, or penalize a move that did nothing.
    ///
    /// Ignored (no events) while input is locked.
    pub fn apply_move(&mut self, direction: Direction, now_ms: u64) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut events: Vec<GameEvent> = self.release_lock(now_ms).into_iter().collect();
        if self.lock.is_locked() {
            return events;
        }
        let slide = self.slide(direction);
        if slide.moved {
            events.extend(self.settle(slide));
        } else {
            events.extend(self.fail_move(direction, now_ms));
        }
        events
    }

    /// Restore the state as of the previous move. Returns the charges left.
    pub fn rewind(&mut self) -> Result<u32, RewindError> {
        if !self.is_active() {
            return Err(RewindError::Inactive);
        }
        if self.rewind.charges() == 0 {
            return Err(RewindError::NoCharges);
        }
        if self.history.len() < 2 {
            return Err(RewindError::NothingToRewind);
        }
        self.rewind.consume()?;
        let snapshot = self
            .history
            .step_back()
            .ok_or(RewindError::NothingToRewind)?;
        self.board = snapshot.board;
        self.score = snapshot.score;
        self.time.restore(snapshot.remaining_ms);
        self.hazards = snapshot.hazards;
        log::info!(
            "Rewound to score {} ({} charges left)",
            self.score,
            self.rewind.charges()
        );
        Ok(self.rewind.charges())
    }

    /// Play-time effects of one tick: countdown, phase cycle and rewind regeneration
    pub fn advance_clock(&mut self, delta_ms: u64) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.time.tick(delta_ms) {
            events.push(self.end(GameOverReason::TimeUp));
            return events;
        }
        if let Some(phase) = self.phase_clock.advance(delta_ms) {
            log::info!("Phase changed to {} (x{})", phase.as_str(), phase.bonus());
            events.push(GameEvent::PhaseChanged {
                phase,
                bonus: phase.bonus(),
            });
        }
        if self
            .rewind
            .regenerate(delta_ms, self.config.rewind_recharge_ms)
        {
            events.push(GameEvent::RewindCharged {
                charges: self.rewind.charges(),
            });
        }
        events
    }

    /// Finish the run
    pub fn end(&mut self, reason: GameOverReason) -> GameEvent {
        self.status = RunStatus::GameOver(reason);
        log::info!(
            "Game over ({:?}): score {} in {} moves",
            reason,
            self.score,
            self.move_count
        );
        GameEvent::GameOver {
            score: self.score,
            moves: self.move_count,
            reason,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            moves: self.move_count,
            remaining_ms: self.time.remaining_ms(),
            max_ms: self.time.max_ms(),
            time_fraction: self.time.fraction(),
            rewind_charges: self.rewind.charges(),
            rewind_progress: self.rewind.progress(),
            phase: self.phase_clock.current(),
            locked: self.lock.is_locked(),
            best_tile: self.board.max_value(),
        }
    }
}
