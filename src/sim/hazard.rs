//! Frozen, bomb and bonus tile tracking
//!
//! Hazards are indexed by cell, not by tile, so every relocation on the board
//! has to be mirrored here. Bomb membership and countdown share one slot so
//! the two can never disagree.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::grid::{Board, Pos, Tile};
use crate::consts::{BOMB_COUNTDOWN, BONUS_TILE_VALUE, GRID_SIZE};

/// Result of a single detonation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Pos,
    /// Tiles removed by the blast
    pub destroyed: Vec<Tile>,
}

/// Position-indexed hazard sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HazardState {
    frozen: [[bool; GRID_SIZE]; GRID_SIZE],
    bombs: [[Option<u8>; GRID_SIZE]; GRID_SIZE],
    bonus: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl HazardState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_frozen(&self, pos: Pos) -> bool {
        self.frozen[pos.row][pos.col]
    }

    #[inline]
    pub fn is_bomb(&self, pos: Pos) -> bool {
        self.bombs[pos.row][pos.col].is_some()
    }

    #[inline]
    pub fn bomb_countdown(&self, pos: Pos) -> Option<u8> {
        self.bombs[pos.row][pos.col]
    }

    #[inline]
    pub fn is_bonus(&self, pos: Pos) -> bool {
        self.bonus[pos.row][pos.col]
    }

    /// Freeze a cell; a bomb there is defused since the two are exclusive
    pub fn freeze(&mut self, pos: Pos) {
        self.bombs[pos.row][pos.col] = None;
        self.frozen[pos.row][pos.col] = true;
    }

    /// Arm a bomb; a freeze there is lifted since the two are exclusive
    pub fn arm_bomb(&mut self, pos: Pos, countdown: u8) {
        self.frozen[pos.row][pos.col] = false;
        self.bombs[pos.row][pos.col] = Some(countdown.max(1));
    }

    pub fn mark_bonus(&mut self, pos: Pos) {
        self.bonus[pos.row][pos.col] = true;
    }

    pub fn defuse(&mut self, pos: Pos) {
        self.bombs[pos.row][pos.col] = None;
    }

    /// Drop every membership at one cell
    pub fn clear_at(&mut self, pos: Pos) {
        self.frozen[pos.row][pos.col] = false;
        self.bombs[pos.row][pos.col] = None;
        self.bonus[pos.row][pos.col] = false;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn clear_bombs(&mut self) -> usize {
        let count = self.bomb_positions().len();
        self.bombs = [[None; GRID_SIZE]; GRID_SIZE];
        count
    }

    pub fn unfreeze_all(&mut self) -> usize {
        let count = self.frozen_positions().len();
        self.frozen = [[false; GRID_SIZE]; GRID_SIZE];
        count
    }

    /// Carry every membership from `from` to `to`
    pub fn relocate(&mut self, from: Pos, to: Pos) {
        if from == to {
            return;
        }
        self.frozen[to.row][to.col] = std::mem::take(&mut self.frozen[from.row][from.col]);
        self.bombs[to.row][to.col] = self.bombs[from.row][from.col].take();
        self.bonus[to.row][to.col] = std::mem::take(&mut self.bonus[from.row][from.col]);
    }

    pub fn frozen_positions(&self) -> Vec<Pos> {
        Pos::all().filter(|&p| self.is_frozen(p)).collect()
    }

    /// Armed bombs with their countdowns, row-major
    pub fn bomb_positions(&self) -> Vec<(Pos, u8)> {
        Pos::all()
            .filter_map(|p| self.bomb_countdown(p).map(|n| (p, n)))
            .collect()
    }

    pub fn bonus_positions(&self) -> Vec<Pos> {
        Pos::all().filter(|&p| self.is_bonus(p)).collect()
    }

    /// Count every bomb down by one; returns the cells that reached zero.
    ///
    /// Expired bombs are removed from the set before being returned.
    pub fn tick_bombs(&mut self) -> Vec<Pos> {
        let mut expired = Vec::new();
        for pos in Pos::all() {
            if let Some(n) = self.bombs[pos.row][pos.col] {
                let n = n.saturating_sub(1);
                if n == 0 {
                    self.bombs[pos.row][pos.col] = None;
                    expired.push(pos);
                } else {
                    self.bombs[pos.row][pos.col] = Some(n);
                }
            }
        }
        expired
    }

    /// Plant a bomb on a random tile that is neither a bomb nor frozen
    pub fn spawn_bomb<R: Rng>(&mut self, board: &Board, rng: &mut R) -> Option<Pos> {
        let candidates: Vec<Pos> = board
            .occupied_cells()
            .into_iter()
            .filter(|&p| !self.is_bomb(p) && !self.is_frozen(p))
            .collect();
        let pos = pick(&candidates, rng)?;
        self.arm_bomb(pos, BOMB_COUNTDOWN);
        Some(pos)
    }

    /// Freeze a random tile that is neither frozen nor a bomb
    pub fn freeze_random<R: Rng>(&mut self, board: &Board, rng: &mut R) -> Option<Pos> {
        let candidates: Vec<Pos> = board
            .occupied_cells()
            .into_iter()
            .filter(|&p| !self.is_frozen(p) && !self.is_bomb(p))
            .collect();
        let pos = pick(&candidates, rng)?;
        self.freeze(pos);
        Some(pos)
    }
}

fn pick<R: Rng>(candidates: &[Pos], rng: &mut R) -> Option<Pos> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}

/// Blow up the 3x3 block around `center`, removing tiles and hazard tags
pub fn explode(board: &mut Board, hazards: &mut HazardState, center: Pos) -> Explosion {
    let mut destroyed = Vec::new();
    for pos in center.neighborhood() {
        if let Some(value) = board.remove(pos) {
            destroyed.push(Tile {
                row: pos.row,
                col: pos.col,
                value,
            });
        }
        hazards.clear_at(pos);
    }
    log::info!(
        "Explosion at ({}, {}) destroyed {} tiles",
        center.row,
        center.col,
        destroyed.len()
    );
    Explosion { center, destroyed }
}

/// Drop a tagged bonus tile on a random empty cell
pub fn spawn_bonus_tile<R: Rng>(
    board: &mut Board,
    hazards: &mut HazardState,
    rng: &mut R,
) -> Option<Pos> {
    let pos = pick(&board.empty_cells(), rng)?;
    board.place(pos, BONUS_TILE_VALUE);
    hazards.mark_bonus(pos);
    Some(pos)
}

/// Deal the tiles onto a random permutation of the occupied cells and wipe all hazards
pub fn shuffle<R: Rng>(board: &mut Board, hazards: &mut HazardState, rng: &mut R) {
    let cells = board.occupied_cells();
    let values: Vec<u64> = cells.iter().filter_map(|&p| board.remove(p)).collect();
    let mut targets = cells;
    targets.shuffle(rng);
    for (pos, value) in targets.into_iter().zip(values) {
        board.place(pos, value);
    }
    hazards.clear_all();
}

/// Reset a random tile worth more than 2 back down to 2
pub fn possess<R: Rng>(board: &mut Board, rng: &mut R) -> Option<Pos> {
    let candidates: Vec<Pos> = board.tiles().filter(|t| t.value > 2).map(|t| t.pos()).collect();
    let pos = pick(&candidates, rng)?;
    board.place(pos, 2);
    Some(pos)
}
