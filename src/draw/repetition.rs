//! Threefold-repetition bookkeeping.
//!
//! Positions are folded into a compact text key covering piece placement,
//! the side to move, castling-relevant unmoved flags, and any open
//! en-passant window. Two positions with the same key are repetitions of
//! each other; the executor records a key per committed move and a third
//! sighting ends the game.

use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;

/// Castling-relevant home squares: the corners and the king files of both
/// back rows. Unmoved flags anywhere else never change what is legal.
const CASTLING_COLUMNS: [u8; 3] = [0, 4, 7];

/// Canonical text key for the current position.
pub fn position_key(state: &GameState) -> String {
    let mut key = String::with_capacity(96);

    for (square, piece) in state.board.pieces() {
        key.push(piece.kind.fen_char(piece.color));
        key.push(char::from(b'0' + square.0));
        key.push(char::from(b'0' + square.1));
    }

    key.push('|');
    key.push(match state.current_player {
        Color::White => 'w',
        Color::Black => 'b',
    });

    for row in [0u8, 7u8] {
        for col in CASTLING_COLUMNS {
            if state
                .board
                .piece_at((row, col))
                .is_some_and(|piece| !piece.has_moved)
            {
                key.push('c');
                key.push(char::from(b'0' + row));
                key.push(char::from(b'0' + col));
            }
        }
    }

    if let Some(square) = state.last_pawn_double_move {
        key.push('e');
        key.push(char::from(b'0' + square.0));
        key.push(char::from(b'0' + square.1));
    }

    key
}

/// Record one sighting of the current position, returning its key.
pub fn record(state: &mut GameState) -> String {
    let key = position_key(state);
    *state.position_history.entry(key.clone()).or_insert(0) += 1;
    key
}

/// Whether `key` has now been seen three or more times.
pub fn is_threefold(state: &GameState, key: &str) -> bool {
    state.position_history.get(key).copied().unwrap_or(0) >= 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_errors::ChessErrors;
    use crate::utils::algebraic::algebraic_to_square as sq;

    #[test]
    fn key_distinguishes_side_to_move() -> Result<(), ChessErrors> {
        let white = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1")?;
        let black = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1")?;
        assert_ne!(position_key(&white), position_key(&black));
        Ok(())
    }

    #[test]
    fn key_distinguishes_castling_rights() -> Result<(), ChessErrors> {
        let full = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")?;
        let none = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1")?;
        assert_ne!(position_key(&full), position_key(&none));
        Ok(())
    }

    #[test]
    fn key_distinguishes_en_passant_window() -> Result<(), ChessErrors> {
        let mut open =
            GameState::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")?;
        let closed = open.clone();
        open.last_pawn_double_move = Some(sq("e4")?);
        assert_ne!(position_key(&open), position_key(&closed));
        Ok(())
    }

    #[test]
    fn third_sighting_trips_threefold() {
        let mut state = GameState::new_game();
        let key = record(&mut state);
        assert!(!is_threefold(&state, &key));
        record(&mut state);
        assert!(!is_threefold(&state, &key));
        record(&mut state);
        assert!(is_threefold(&state, &key));
    }
}
