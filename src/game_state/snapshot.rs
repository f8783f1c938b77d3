//! Whole-state snapshots for the undo stack.
//!
//! A snapshot is a complete value copy of everything a committed move can
//! touch, so restoration is exact by construction. No piece record is ever
//! shared between a snapshot and the live state.

use std::collections::HashMap;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::game_state::game_state::GameState;

/// One entry on the undo stack: the full position as it was before a move.
#[derive(Debug, Clone)]
pub struct Snapshot {
    board: Board,
    current_player: Color,
    last_pawn_double_move: Option<Square>,
    half_move_counter: u32,
    move_counter: u32,
    position_history: HashMap<String, u32>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Snapshot {
            board: state.board,
            current_player: state.current_player,
            last_pawn_double_move: state.last_pawn_double_move,
            half_move_counter: state.half_move_counter,
            move_counter: state.move_counter,
            position_history: state.position_history.clone(),
        }
    }

    /// Rebuild the live state wholesale from this snapshot.
    pub fn restore(self) -> GameState {
        GameState {
            board: self.board,
            current_player: self.current_player,
            last_pawn_double_move: self.last_pawn_double_move,
            half_move_counter: self.half_move_counter,
            move_counter: self.move_counter,
            position_history: self.position_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_then_restore_is_identity() {
        let mut state = GameState::new_game();
        state.position_history.insert("probe".to_string(), 2);
        let snapshot = Snapshot::capture(&state);
        let restored = snapshot.restore();
        assert_eq!(restored, state);
    }
}
