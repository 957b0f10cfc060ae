//! Slide and merge pass
//!
//! One call moves every tile as far as it goes in a direction, merging equal
//! neighbours at most once each. Hazards travel with their tiles, frozen
//! tiles stay put, and a merge touching a bomb detonates it on the spot.
//!
//! Time bonuses are not applied here; the caller settles them after the
//! pass so effects can be sequenced against final positions.

use serde::{Deserialize, Serialize};

use super::grid::{Board, Direction, Pos};
use super::hazard::{Explosion, HazardState, explode};
use crate::consts::GRID_SIZE;

/// A single merge produced by a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merge {
    /// Value of the combined tile
    pub value: u64,
    /// Cell the combined tile ended up in
    pub pos: Pos,
    /// Cell the absorbed tile came from
    pub from: Pos,
}

/// Outcome of the slide/merge pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideResult {
    pub direction: Direction,
    /// At least one tile slid or merged
    pub moved: bool,
    /// Merges in traversal order
    pub merges: Vec<Merge>,
    /// Bombs set off by merging into or out of a bomb cell
    pub explosions: Vec<Explosion>,
}

impl SlideResult {
    /// Points earned by this slide
    pub fn merge_score(&self) -> u64 {
        self.merges.iter().map(|m| m.value).sum()
    }
}

/// Run the slide/merge pass over `board`, keeping `hazards` in step
pub fn slide(board: &mut Board, hazards: &mut HazardState, direction: Direction) -> SlideResult {
    let (rows, cols) = direction.traversal();
    let mut merged = [[false; GRID_SIZE]; GRID_SIZE];
    let mut result = SlideResult {
        direction,
        moved: false,
        merges: Vec::new(),
        explosions: Vec::new(),
    };

    for &row in &rows {
        for &col in &cols {
            let pos = Pos { row, col };
            let Some(value) = board.get(pos) else {
                continue;
            };
            if hazards.is_frozen(pos) {
                continue;
            }

            let reach = board.reach(pos, direction);
            let target = reach.next.filter(|&next| {
                board.get(next) == Some(value)
                    && !merged[next.row][next.col]
                    && !hazards.is_frozen(next)
            });

            if let Some(next) = target {
                let combined = value.saturating_mul(2);
                let bomb_involved = hazards.is_bomb(pos) || hazards.is_bomb(next);

                board.remove(pos);
                board.place(next, combined);
                hazards.clear_at(pos);
                merged[next.row][next.col] = true;
                result.merges.push(Merge {
                    value: combined,
                    pos: next,
                    from: pos,
                });

                if bomb_involved {
                    hazards.defuse(next);
                    let blast = explode(board, hazards, next);
                    for cell in next.neighborhood() {
                        merged[cell.row][cell.col] = false;
                    }
                    result.explosions.push(blast);
                }
                result.moved = true;
            } else if reach.farthest != pos {
                board.relocate(pos, reach.farthest);
                hazards.relocate(pos, reach.farthest);
                result.moved = true;
            }
        }
    }

    result
}

/// Would sliding this way change anything? Leaves the inputs untouched.
pub fn can_slide(board: &Board, hazards: &HazardState, direction: Direction) -> bool {
    let mut board = *board;
    let mut hazards = *hazards;
    slide(&mut board, &mut hazards, direction).moved
}
