//! Per-piece geometric move legality.
//!
//! Everything here is a pure predicate over the position: no resulting-check
//! test is performed (that belongs to the check detector) and nothing is
//! mutated. `is_legal_geometry` is the turn-aware entry point; the raw
//! per-piece rules in `piece_geometry` are shared with attack scanning,
//! which must ignore whose turn it actually is.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::rules::check_detector::is_square_under_attack;

/// Geometric legality of moving the current player's piece from `from` to
/// `to`. Does not test whether the mover's own king ends up in check.
pub fn is_legal_geometry(state: &GameState, from: Square, to: Square) -> bool {
    if from.0 > 7 || from.1 > 7 || to.0 > 7 || to.1 > 7 || from == to {
        return false;
    }
    let Some(piece) = state.board.piece_at(from) else {
        return false;
    };
    if piece.color != state.current_player {
        return false;
    }
    if piece.kind == PieceKind::King && is_castling_shape(from, to) {
        return is_valid_castling(state, from, to);
    }
    piece_geometry(&state.board, state.last_pawn_double_move, from, to, piece)
}

/// Raw movement geometry for one piece, independent of whose turn it is.
/// Kings are limited to single steps here; the castling shape is resolved
/// separately because castling never attacks a square.
pub(crate) fn piece_geometry(
    board: &Board,
    last_pawn_double_move: Option<Square>,
    from: Square,
    to: Square,
    piece: &Piece,
) -> bool {
    if from == to {
        return false;
    }
    let d_row = to.0 as i8 - from.0 as i8;
    let d_col = to.1 as i8 - from.1 as i8;

    match piece.kind {
        PieceKind::Pawn => pawn_geometry(board, last_pawn_double_move, from, to, piece),
        PieceKind::Rook => (d_row == 0 || d_col == 0) && is_path_clear(board, from, to),
        PieceKind::Bishop => d_row.abs() == d_col.abs() && is_path_clear(board, from, to),
        PieceKind::Queen => {
            (d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs())
                && is_path_clear(board, from, to)
        }
        PieceKind::Knight => {
            (d_row.abs() == 2 && d_col.abs() == 1) || (d_row.abs() == 1 && d_col.abs() == 2)
        }
        PieceKind::King => d_row.abs() <= 1 && d_col.abs() <= 1,
    }
}

fn pawn_geometry(
    board: &Board,
    last_pawn_double_move: Option<Square>,
    from: Square,
    to: Square,
    piece: &Piece,
) -> bool {
    let step = piece.color.forward_step();
    let d_row = to.0 as i8 - from.0 as i8;
    let d_col = to.1 as i8 - from.1 as i8;

    // Straight pushes land only on empty squares.
    if d_col == 0 {
        if d_row == step {
            return board.piece_at(to).is_none();
        }
        if d_row == 2 * step && from.0 == piece.color.pawn_start_row() {
            let Some(between) = Board::offset(from, step, 0) else {
                return false;
            };
            return board.piece_at(between).is_none() && board.piece_at(to).is_none();
        }
        return false;
    }

    // Diagonal one-step: capture, or en passant onto the empty square.
    if d_col.abs() == 1 && d_row == step {
        return match board.piece_at(to) {
            Some(target) => target.color != piece.color,
            None => last_pawn_double_move == Some((from.0, to.1)),
        };
    }

    false
}

/// Walks unit steps strictly between origin and destination; any occupied
/// square fails it. Callers guarantee the two squares share a line.
pub fn is_path_clear(board: &Board, from: Square, to: Square) -> bool {
    let d_row = (to.0 as i8 - from.0 as i8).signum();
    let d_col = (to.1 as i8 - from.1 as i8).signum();

    let mut cursor = from;
    loop {
        cursor = match Board::offset(cursor, d_row, d_col) {
            Some(next) => next,
            None => return false,
        };
        if cursor == to {
            return true;
        }
        if board.piece_at(cursor).is_some() {
            return false;
        }
    }
}

#[inline]
fn is_castling_shape(from: Square, to: Square) -> bool {
    from.0 == to.0 && (to.1 as i8 - from.1 as i8).abs() == 2
}

/// Castling preconditions: king unmoved and not in check, the rook on the
/// corresponding side present and unmoved, and every square the king
/// traverses (origin included) unattacked, with all but the origin empty.
pub fn is_valid_castling(state: &GameState, from: Square, to: Square) -> bool {
    let Some(king) = state.board.piece_at(from) else {
        return false;
    };
    if king.kind != PieceKind::King || king.has_moved || !is_castling_shape(from, to) {
        return false;
    }

    let row = from.0;
    let kingside = to.1 > from.1;
    let rook_col = if kingside { 7 } else { 0 };
    let rook_ok = state
        .board
        .piece_at((row, rook_col))
        .is_some_and(|p| p.kind == PieceKind::Rook && p.color == king.color && !p.has_moved);
    if !rook_ok {
        return false;
    }

    let opponent = king.color.opposite();
    let (low, high) = if kingside {
        (from.1, to.1)
    } else {
        (to.1, from.1)
    };
    for col in low..=high {
        let square = (row, col);
        if square != from && state.board.piece_at(square).is_some() {
            return false;
        }
        if is_square_under_attack(
            &state.board,
            state.last_pawn_double_move,
            square,
            opponent,
            true,
        ) {
            return false;
        }
    }

    true
}
