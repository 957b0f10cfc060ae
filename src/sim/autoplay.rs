//! Greedy direction chooser for demo and idle play

use super::engine::slide;
use super::grid::Direction;
use super::state::GameState;

/// Pick the direction with the best immediate payoff.
///
/// Merge score decides first, then fewest tiles left on the board. Ties keep
/// the earlier entry of `Direction::ALL`. Returns None when nothing moves.
pub fn pick_direction(state: &GameState) -> Option<Direction> {
    let mut best: Option<(Direction, u64, usize)> = None;
    for direction in Direction::ALL {
        let mut board = state.board;
        let mut hazards = state.hazards;
        let result = slide(&mut board, &mut hazards, direction);
        if !result.moved {
            continue;
        }
        let gain = result.merge_score();
        let tiles = board.tile_count();
        let better = match best {
            None => true,
            Some((_, best_gain, best_tiles)) => {
                gain > best_gain || (gain == best_gain && tiles < best_tiles)
            }
        };
        if better {
            best = Some((direction, gain, tiles));
        }
    }
    best.map(|(direction, _, _)| direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use crate::sim::grid::Board;

    fn state(rows: [[u64; 4]; 4]) -> GameState {
        GameState::with_board(Difficulty::Normal, 3, Board::from_rows(rows))
    }

    #[test]
    fn test_prefers_biggest_merge() {
        // a horizontal merge of 2s against a vertical merge of 8s
        let state = state([[2, 2, 0, 8], [0, 0, 0, 8], [0; 4], [0; 4]]);
        let pick = pick_direction(&state).unwrap();
        assert!(matches!(pick, Direction::Up | Direction::Down));
    }

    #[test]
    fn test_falls_back_to_any_move() {
        let state = state([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let pick = pick_direction(&state).unwrap();
        assert!(matches!(pick, Direction::Down | Direction::Right));
    }

    #[test]
    fn test_none_when_jammed() {
        let state = state([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(pick_direction(&state), None);
    }

    #[test]
    fn test_pick_is_always_playable() {
        let mut state = GameState::new(Difficulty::Easy, 99);
        for i in 0..200u64 {
            let Some(direction) = pick_direction(&state) else {
                break;
            };
            let events = state.apply_move(direction, i * 200);
            assert!(
                !events
                    .iter()
                    .any(|e| matches!(e, crate::sim::GameEvent::BadMove { .. }))
            );
            if !state.is_active() {
                break;
            }
        }
        assert!(state.move_count > 0);
    }
}
