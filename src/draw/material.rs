//! Dead-position detection by material census.
//!
//! The draw fires only for the classical book cases: bare kings, king and
//! one minor piece against a bare king, and king-and-bishop each where both
//! bishops live on the same square color. Any pawn, rook, or queen on the
//! board keeps the game alive.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};

/// True when neither side retains mating material.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut minors: Vec<(PieceKind, Color, Square)> = Vec::new();

    for (square, piece) in board.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => {
                minors.push((piece.kind, piece.color, square));
                if minors.len() > 2 {
                    return false;
                }
            }
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }

    match minors.as_slice() {
        [] => true,
        [_] => true,
        [(PieceKind::Bishop, first_color, first), (PieceKind::Bishop, second_color, second)] => {
            first_color != second_color && square_shade(*first) == square_shade(*second)
        }
        _ => false,
    }
}

/// Light or dark square, as the parity of row plus column.
fn square_shade(square: Square) -> u8 {
    (square.0 + square.1) % 2
}
