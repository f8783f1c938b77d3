//! Position evaluation.
//!
//! Material values plus a pawn placement table and a small bonus for minor
//! pieces on the four central squares. Scores are signed from the given
//! perspective: that side's pieces add, the opponent's subtract. Sentinels
//! well beyond any material sum mark forced outcomes for search.

use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::game_state::GameState;

pub type Score = i32;

pub const MIN_SCORE: Score = -1_000_000_000;
pub const MAX_SCORE: Score = 1_000_000_000;

pub const fn piece_value(kind: PieceKind) -> Score {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Pawn placement bonuses in Black's orientation (row 0 is Black's back
/// rank, so higher row indices are deeper in White's territory). White
/// pawns read the table mirrored.
const PAWN_TABLE: [[Score; 8]; 8] = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [50, 50, 50, 50, 50, 50, 50, 50],
];

fn pawn_bonus(color: Color, square: Square) -> Score {
    match color {
        Color::Black => PAWN_TABLE[square.0 as usize][square.1 as usize],
        Color::White => PAWN_TABLE[7 - square.0 as usize][square.1 as usize],
    }
}

/// Knights and bishops on d4, e4, d5, or e5 earn a flat bonus.
fn central_minor_bonus(kind: PieceKind, square: Square) -> Score {
    let central = (3..=4).contains(&square.0) && (3..=4).contains(&square.1);
    match kind {
        PieceKind::Knight | PieceKind::Bishop if central => 10,
        _ => 0,
    }
}

/// Signed evaluation of `state` as seen by `perspective`.
pub fn evaluate(state: &GameState, perspective: Color) -> Score {
    let mut total = 0;
    for (square, piece) in state.board.pieces() {
        let mut value = piece_value(piece.kind) + central_minor_bonus(piece.kind, square);
        if piece.kind == PieceKind::Pawn {
            value += pawn_bonus(piece.color, square);
        }
        if piece.color == perspective {
            total += value;
        } else {
            total -= value;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_errors::ChessErrors;

    #[test]
    fn starting_position_is_balanced() {
        let state = GameState::new_game();
        assert_eq!(evaluate(&state, Color::White), 0);
        assert_eq!(evaluate(&state, Color::Black), 0);
    }

    #[test]
    fn perspectives_are_mirror_images() -> Result<(), ChessErrors> {
        let state = GameState::from_fen("4k3/8/8/3n4/8/8/PP6/4K3 w - - 0 1")?;
        assert_eq!(
            evaluate(&state, Color::White),
            -evaluate(&state, Color::Black)
        );
        Ok(())
    }

    #[test]
    fn material_edge_shows_up() -> Result<(), ChessErrors> {
        let state = GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1")?;
        assert!(evaluate(&state, Color::White) >= 900);
        assert!(evaluate(&state, Color::Black) <= -900);
        Ok(())
    }

    #[test]
    fn central_knight_outscores_a_rim_knight() -> Result<(), ChessErrors> {
        let central = GameState::from_fen("4k3/8/8/3n4/8/8/8/4K3 w - - 0 1")?;
        let rim = GameState::from_fen("4k3/8/8/n7/8/8/8/4K3 w - - 0 1")?;
        assert_eq!(
            evaluate(&central, Color::Black) - evaluate(&rim, Color::Black),
            10
        );
        Ok(())
    }

    #[test]
    fn advanced_pawns_score_higher() -> Result<(), ChessErrors> {
        let home = GameState::from_fen("4k3/p7/8/8/8/8/8/4K3 w - - 0 1")?;
        let deep = GameState::from_fen("4k3/8/8/8/8/8/p7/4K3 w - - 0 1")?;
        assert!(evaluate(&deep, Color::Black) > evaluate(&home, Color::Black));
        Ok(())
    }
}
