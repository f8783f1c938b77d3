//! GameState-to-FEN serialization.
//!
//! The castling field is derived structurally from `has_moved` flags on the
//! king/rook home squares; a rook captured in place never revokes a right.
//! The halfmove-clock field is always emitted as `0` (the 50-move rule is
//! not tracked). The en-passant field carries the double-stepped pawn's
//! destination square, the dialect the rest of this system speaks.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(state: &GameState) -> String {
    let board = generate_board_field(&state.board);
    let side_to_move = match state.current_player {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(&state.board);
    let en_passant = match state.last_pawn_double_move {
        Some(square) => square_to_algebraic(square).unwrap_or_else(|_| "-".to_owned()),
        None => "-".to_owned(),
    };

    format!(
        "{} {} {} {} 0 {}",
        board, side_to_move, castling, en_passant, state.move_counter
    )
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0u8;

        for col in 0..8u8 {
            if let Some(piece) = board.piece_at((row, col)) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece.kind.fen_char(piece.color));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(board: &Board) -> String {
    let mut out = String::new();

    if castling_pair_unmoved(board, Color::White, 7) {
        out.push('K');
    }
    if castling_pair_unmoved(board, Color::White, 0) {
        out.push('Q');
    }
    if castling_pair_unmoved(board, Color::Black, 7) {
        out.push('k');
    }
    if castling_pair_unmoved(board, Color::Black, 0) {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

/// True when both the king and the rook on `rook_col` sit unmoved on their
/// home squares for `color`.
fn castling_pair_unmoved(board: &Board, color: Color, rook_col: u8) -> bool {
    let row = color.back_row();
    let king_home = board
        .piece_at((row, 4))
        .is_some_and(|p| p.kind == PieceKind::King && p.color == color && !p.has_moved);
    let rook_home = board
        .piece_at((row, rook_col))
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == color && !p.has_moved);
    king_home && rook_home
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::game_state::{GameState, STARTING_POSITION_FEN};
    use crate::notation::fen_parser::parse_fen;

    #[test]
    fn starting_position_renders_canonical_fen() {
        let state = GameState::new_game();
        assert_eq!(generate_fen(&state), STARTING_POSITION_FEN);
    }

    #[test]
    fn round_trip_custom_position_fen() -> Result<(), ChessErrors> {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 0 6";
        let parsed = parse_fen(fen)?;
        assert_eq!(generate_fen(&parsed), fen);
        Ok(())
    }

    #[test]
    fn en_passant_field_carries_double_step_destination() -> Result<(), ChessErrors> {
        let mut state = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")?;
        state.last_pawn_double_move = Some((4, 4));
        assert!(generate_fen(&state).contains(" b KQkq e4 0 1"));
        Ok(())
    }
}
