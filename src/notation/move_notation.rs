//! Algebraic move descriptions.
//!
//! `describe_move` reads the position BEFORE the move is applied, since
//! capture detection and disambiguation both depend on the origin still
//! being occupied. The check and checkmate suffixes depend on the position
//! AFTER the move, so they are appended separately by the executor via
//! `status_suffix`.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::rules::check_detector::evaluate_move_safety;
use crate::rules::move_validator::piece_geometry;
use crate::state_machine::machine_state::MachineState;
use crate::utils::algebraic::{file_char, rank_char};

/// Base algebraic text for moving `from` to `to` in `state`, without any
/// check or mate suffix. Castling renders as O-O / O-O-O; pawn promotion
/// always appends `=Q` (the executor promotes to a queen unconditionally).
pub fn describe_move(state: &GameState, from: Square, to: Square) -> Result<String, ChessErrors> {
    let piece = state
        .board
        .piece_at(from)
        .ok_or(ChessErrors::InvalidSquare(from))?;

    if piece.kind == PieceKind::King && (to.1 as i8 - from.1 as i8).abs() == 2 {
        return Ok(if to.1 > from.1 {
            "O-O".to_owned()
        } else {
            "O-O-O".to_owned()
        });
    }

    let is_capture = state.board.piece_at(to).is_some()
        || (piece.kind == PieceKind::Pawn
            && from.1 != to.1
            && state.last_pawn_double_move == Some((from.0, to.1)));

    let mut out = String::new();
    if let Some(letter) = piece.kind.notation_letter() {
        out.push(letter);
        out.push_str(&disambiguation(state, from, to)?);
    } else if is_capture {
        out.push(file_char(from.1));
    }
    if is_capture {
        out.push('x');
    }
    out.push(file_char(to.1));
    out.push(rank_char(to.0));

    if piece.kind == PieceKind::Pawn && to.0 == piece.color.promotion_row() {
        out.push_str("=Q");
    }

    Ok(out)
}

/// Suffix for the state reached after the move: `#` on mate, `+` on check,
/// nothing otherwise.
pub fn status_suffix(machine_state: MachineState) -> &'static str {
    match machine_state {
        MachineState::Checkmate(_) => "#",
        MachineState::Check(_) => "+",
        _ => "",
    }
}

/// Minimal origin qualifier when another piece of the same kind and color
/// could also legally reach `to`: file if it settles the ambiguity, rank if
/// the file does not, both as a last resort.
fn disambiguation(state: &GameState, from: Square, to: Square) -> Result<String, ChessErrors> {
    let piece = state
        .board
        .piece_at(from)
        .ok_or(ChessErrors::InvalidSquare(from))?;

    let mut rivals: Vec<Square> = Vec::new();
    for (square, other) in state.board.pieces() {
        if square == from || other.kind != piece.kind || other.color != piece.color {
            continue;
        }
        if piece_geometry(&state.board, state.last_pawn_double_move, square, to, other)
            && evaluate_move_safety(state, square, to, piece.color)?
        {
            rivals.push(square);
        }
    }

    if rivals.is_empty() {
        return Ok(String::new());
    }
    if rivals.iter().all(|rival| rival.1 != from.1) {
        return Ok(file_char(from.1).to_string());
    }
    if rivals.iter().all(|rival| rival.0 != from.0) {
        return Ok(rank_char(from.0).to_string());
    }
    Ok(format!("{}{}", file_char(from.1), rank_char(from.0)))
}
