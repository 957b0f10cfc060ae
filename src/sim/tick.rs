//! Command and tick driver
//!
//! A `Session` serializes player commands against the periodic tick. A
//! successful slide holds the board for a short settle window; the deferred
//! batch (time bonuses, bomb countdowns, new tile, event roll, snapshot) runs
//! on the first tick after the window closes.

use serde::{Deserialize, Serialize};

use super::engine::SlideResult;
use super::grid::Direction;
use super::history::RewindError;
use super::state::{GameEvent, GameState, Hud, RunStatus};
use crate::consts::{MOVE_COOLDOWN_MS, SETTLE_MS};
use crate::settings::Difficulty;

/// A resolved player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Direction),
    Rewind,
}

impl Command {
    /// Parse a command word; unknown words resolve to nothing
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rewind" | "undo" | "z" => Some(Command::Rewind),
            other => Direction::from_str(other).map(Command::Move),
        }
    }
}

/// Deferred batch waiting for its settle window to close
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingSettle {
    due_ms: u64,
    slide: SlideResult,
}

/// A running game plus the timing rules around it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    state: GameState,
    /// Clock reading of the previous tick
    last_tick_ms: u64,
    /// Clock reading of the last accepted move
    last_move_ms: Option<u64>,
    pending: Option<PendingSettle>,
}

impl Session {
    /// Start a fresh run at clock reading `now_ms`
    pub fn new(difficulty: Difficulty, seed: u64, now_ms: u64) -> Self {
        Self::from_state(GameState::new(difficulty, seed), now_ms)
    }

    /// Drive an already prepared game
    pub fn from_state(state: GameState, now_ms: u64) -> Self {
        Self {
            state,
            last_tick_ms: now_ms,
            last_move_ms: None,
            pending: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn hud(&self) -> Hud {
        self.state.hud()
    }

    /// A move's deferred batch has not run yet
    pub fn is_settling(&self) -> bool {
        self.pending.is_some()
    }

    /// Would a move command be accepted right now?
    pub fn accepts_moves(&self, now_ms: u64) -> bool {
        self.state.is_active()
            && self.pending.is_none()
            && !self.state.lock.is_locked()
            && self
                .last_move_ms
                .is_none_or(|last| now_ms.saturating_sub(last) >= MOVE_COOLDOWN_MS)
    }

    /// Apply one player command. Rejected moves produce no events.
    pub fn handle(&mut self, command: Command, now_ms: u64) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = self.state.release_lock(now_ms).into_iter().collect();

        match command {
            Command::Move(direction) => {
                if !self.accepts_moves(now_ms) {
                    log::debug!("Move {} ignored at {}ms", direction.as_str(), now_ms);
                    return events;
                }
                self.last_move_ms = Some(now_ms);
                let slide = self.state.slide(direction);
                if slide.moved {
                    events.push(GameEvent::Slid(slide.clone()));
                    self.pending = Some(PendingSettle {
                        due_ms: now_ms.saturating_add(SETTLE_MS),
                        slide,
                    });
                } else {
                    events.extend(self.state.fail_move(direction, now_ms));
                }
            }
            Command::Rewind => {
                let outcome = if self.pending.is_some() {
                    Err(RewindError::Busy)
                } else {
                    self.state.rewind()
                };
                events.push(match outcome {
                    Ok(charges_remaining) => GameEvent::Rewound { charges_remaining },
                    Err(reason) => {
                        log::debug!("Rewind refused: {reason}");
                        GameEvent::RewindFailed(reason)
                    }
                });
            }
        }
        events
    }

    /// Advance to clock reading `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let delta_ms = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;
        if !self.state.is_active() {
            return Vec::new();
        }

        let mut events: Vec<GameEvent> = self.state.release_lock(now_ms).into_iter().collect();

        if self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms) {
            if let Some(pending) = self.pending.take() {
                events.extend(self.state.settle(pending.slide));
            }
            if !self.state.is_active() {
                return events;
            }
        }

        events.extend(self.state.advance_clock(delta_ms));
        if !self.state.is_active() {
            self.pending = None;
        }
        events
    }

    /// Leave the run: stops the clock and drops any pending batch
    pub fn quit(&mut self) {
        if self.state.is_active() {
            log::info!("Run abandoned at score {}", self.state.score);
        }
        self.state.status = RunStatus::Idle;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::grid::{Board, Pos};
    use crate::sim::state::GameOverReason;

    fn session(rows: [[u64; 4]; 4]) -> Session {
        let state = GameState::with_board(Difficulty::Normal, 12345, Board::from_rows(rows));
        Session::from_state(state, 0)
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("up"), Some(Command::Move(Direction::Up)));
        assert_eq!(Command::parse("Rewind"), Some(Command::Rewind));
        assert_eq!(Command::parse("jump"), None);
    }

    #[test]
    fn test_move_defers_batch_until_settled() {
        let mut session = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let events = session.handle(Command::Move(Direction::Left), 0);
        assert!(matches!(events.as_slice(), [GameEvent::Slid(_)]));
        assert!(session.is_settling());
        assert_eq!(session.state().score, 4);
        // bonus not yet paid, no tile spawned yet
        assert_eq!(session.state().time.remaining_ms(), 45_000);
        assert_eq!(session.state().board.tile_count(), 1);

        let events = session.tick(TICK_MS);
        assert!(events.is_empty());
        assert!(session.is_settling());

        let events = session.tick(SETTLE_MS);
        assert!(matches!(events.first(), Some(GameEvent::Moved(_))));
        assert!(!session.is_settling());
        assert_eq!(session.state().board.tile_count(), 2);
        // +200 at dawn's 1.2x, against SETTLE_MS of decay over both ticks
        assert_eq!(
            session.state().time.remaining_ms(),
            45_000 + 240 - SETTLE_MS as i64
        );
    }

    #[test]
    fn test_moves_rejected_while_settling_and_in_cooldown() {
        let mut session = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.handle(Command::Move(Direction::Left), 0);
        let before = session.state().board;

        assert!(session.handle(Command::Move(Direction::Right), 50).is_empty());
        assert_eq!(session.state().board, before);
        assert_eq!(
            session.handle(Command::Rewind, 50),
            vec![GameEvent::RewindFailed(RewindError::Busy)]
        );

        session.tick(SETTLE_MS);
        assert!(!session.accepts_moves(SETTLE_MS + 1));
        assert!(session.handle(Command::Move(Direction::Right), 140).is_empty());
        assert!(session.accepts_moves(MOVE_COOLDOWN_MS));
        assert!(!session.handle(Command::Move(Direction::Right), MOVE_COOLDOWN_MS).is_empty());
    }

    #[test]
    fn test_bad_moves_lock_input() {
        let mut session = session([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.handle(Command::Move(Direction::Up), 0);
        session.handle(Command::Move(Direction::Left), 200);
        let events = session.handle(Command::Move(Direction::Up), 400);
        assert!(events.contains(&GameEvent::LockEngaged {
            until_ms: 400 + LOCK_DURATION_MS
        }));
        assert_eq!(session.state().time.remaining_ms(), 45_000 - 3 * BAD_MOVE_PENALTY_MS);

        // locked: even a valid move is ignored and costs nothing
        assert!(session.handle(Command::Move(Direction::Down), 1000).is_empty());
        assert_eq!(session.state().board.get(Pos::new(0, 0).unwrap()), Some(2));

        let events = session.tick(400 + LOCK_DURATION_MS);
        assert!(events.contains(&GameEvent::LockReleased));
        assert!(!session.handle(Command::Move(Direction::Down), 400 + LOCK_DURATION_MS).is_empty());
        assert_eq!(session.state().lock.consecutive_failures(), 0);
    }

    #[test]
    fn test_time_runs_out_once() {
        let mut session = session([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut game_overs = 0;
        let mut now = 0;
        while now < 50_000 {
            now += TICK_MS;
            for event in session.tick(now) {
                if let GameEvent::GameOver { reason, .. } = event {
                    assert_eq!(reason, GameOverReason::TimeUp);
                    game_overs += 1;
                }
            }
        }
        assert_eq!(game_overs, 1);
        assert_eq!(session.state().time.remaining_ms(), 0);
        assert!(session.handle(Command::Move(Direction::Right), now).is_empty());
    }

    #[test]
    fn test_time_up_discards_pending_batch() {
        let mut state = GameState::with_board(
            Difficulty::Normal,
            12345,
            Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]),
        );
        state.time.penalize(45_000 - 100);
        let mut session = Session::from_state(state, 0);
        assert!(matches!(
            session.handle(Command::Move(Direction::Left), 0).as_slice(),
            [GameEvent::Slid(_)]
        ));

        // the countdown runs out before the settle window closes
        let mut events = session.tick(TICK_MS * 7);
        assert!(TICK_MS * 7 < SETTLE_MS);
        events.extend(session.tick(SETTLE_MS));
        events.extend(session.tick(SETTLE_MS + TICK_MS));

        assert!(!session.is_settling());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Moved(_))));
        let game_overs: Vec<&GameEvent> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(
            game_overs,
            vec![&GameEvent::GameOver {
                score: 4,
                moves: 1,
                reason: GameOverReason::TimeUp
            }]
        );
        assert_eq!(session.state().board.tile_count(), 1);
    }

    #[test]
    fn test_phase_transition_fires_once() {
        let mut session = session([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(session.tick(29_999).is_empty());
        assert_eq!(session.hud().phase, crate::sim::Phase::Dawn);
        let events = session.tick(30_000);
        assert!(events.contains(&GameEvent::PhaseChanged {
            phase: crate::sim::Phase::Day,
            bonus: 1.0
        }));
        assert!(!session
            .tick(30_016)
            .iter()
            .any(|e| matches!(e, GameEvent::PhaseChanged { .. })));
    }

    #[test]
    fn test_quit_discards_pending_batch() {
        let mut session = session([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        session.handle(Command::Move(Direction::Left), 0);
        session.quit();
        assert!(!session.is_settling());
        assert!(session.tick(1000).is_empty());
        assert_eq!(session.state().status, RunStatus::Idle);
        assert_eq!(session.state().board.tile_count(), 1);
    }

    #[test]
    fn test_rewind_through_session() {
        let mut session = session([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert_eq!(
            session.handle(Command::Rewind, 0),
            vec![GameEvent::RewindFailed(RewindError::NothingToRewind)]
        );
        session.handle(Command::Move(Direction::Right), 0);
        session.tick(SETTLE_MS);
        let after_move = session.state().board;
        assert_ne!(after_move, Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]));

        let events = session.handle(Command::Rewind, 200);
        assert_eq!(
            events,
            vec![GameEvent::Rewound {
                charges_remaining: STARTING_REWIND_CHARGES - 1
            }]
        );
        assert_eq!(
            session.state().board,
            Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]])
        );
    }
}
