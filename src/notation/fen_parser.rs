//! FEN-to-GameState parser.
//!
//! Rebuilds a position from a Forsyth-Edwards Notation string, deriving
//! `has_moved` flags from the castling field and from piece placement
//! (pawns off their start rank, kings and rooks off their home squares).
//! The halfmove-clock field is accepted and discarded; the per-ply counter
//! is derived from the fullmove number and the side to move.

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::algebraic_to_square;
use std::collections::HashMap;

pub fn parse_fen(fen: &str) -> Result<GameState, ChessErrors> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(ChessErrors::InvalidFenForm(fen.to_string()));
    }

    let mut board = parse_board(fields[0], fen)?;
    let current_player = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(ChessErrors::InvalidFenForm(fen.to_string())),
    };

    derive_moved_flags_from_placement(&mut board);
    apply_castling_field(&mut board, fields[2])?;

    let last_pawn_double_move = parse_en_passant(fields[3])?;

    if fields[4].parse::<u32>().is_err() {
        return Err(ChessErrors::InvalidFenForm(fen.to_string()));
    }
    let move_counter = fields[5]
        .parse::<u32>()
        .map_err(|_| ChessErrors::InvalidFenForm(fen.to_string()))?
        .max(1);

    let black_extra = match current_player {
        Color::White => 0,
        Color::Black => 1,
    };
    let half_move_counter = (move_counter - 1) * 2 + black_extra + 1;

    Ok(GameState {
        board,
        current_player,
        last_pawn_double_move,
        half_move_counter,
        move_counter,
        position_history: HashMap::new(),
    })
}

fn parse_board(board_field: &str, fen: &str) -> Result<Board, ChessErrors> {
    let ranks: Vec<&str> = board_field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessErrors::InvalidFenForm(fen.to_string()));
    }

    let mut board = Board::empty();

    for (row, rank_text) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_text.chars() {
            if let Some(step) = ch.to_digit(10) {
                if !(1..=8).contains(&step) {
                    return Err(ChessErrors::InvalidFenToken(ch));
                }
                col += step as u8;
                continue;
            }

            let (color, kind) =
                piece_from_fen_char(ch).ok_or(ChessErrors::InvalidFenToken(ch))?;
            if col >= 8 {
                return Err(ChessErrors::InvalidFenForm(fen.to_string()));
            }
            board.place((row as u8, col), Piece::new(kind, color));
            col += 1;
        }

        if col != 8 {
            return Err(ChessErrors::InvalidFenForm(fen.to_string()));
        }
    }

    Ok(board)
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some((color, kind))
}

/// Pieces standing away from their conventional start squares must have
/// moved at some point; pieces still on them are assumed unmoved until the
/// castling field says otherwise.
fn derive_moved_flags_from_placement(board: &mut Board) {
    for square in Board::squares() {
        let Some(piece) = board.piece_at_mut(square) else {
            continue;
        };
        let home = match piece.kind {
            PieceKind::Pawn => square.0 == piece.color.pawn_start_row(),
            PieceKind::King => square == (piece.color.back_row(), 4),
            PieceKind::Rook => {
                square == (piece.color.back_row(), 0) || square == (piece.color.back_row(), 7)
            }
            _ => true,
        };
        if !home {
            piece.has_moved = true;
        }
    }
}

fn apply_castling_field(board: &mut Board, field: &str) -> Result<(), ChessErrors> {
    let mut rights = [false; 4];
    if field != "-" {
        for ch in field.chars() {
            match ch {
                'K' => rights[0] = true,
                'Q' => rights[1] = true,
                'k' => rights[2] = true,
                'q' => rights[3] = true,
                _ => return Err(ChessErrors::InvalidFenToken(ch)),
            }
        }
    }

    for (color, kingside, queenside) in [
        (Color::White, rights[0], rights[1]),
        (Color::Black, rights[2], rights[3]),
    ] {
        let row = color.back_row();
        if !kingside {
            mark_moved_if(board, (row, 7), PieceKind::Rook, color);
        }
        if !queenside {
            mark_moved_if(board, (row, 0), PieceKind::Rook, color);
        }
        if !kingside && !queenside {
            mark_moved_if(board, (row, 4), PieceKind::King, color);
        }
    }

    Ok(())
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, ChessErrors> {
    if field == "-" {
        return Ok(None);
    }
    Ok(Some(algebraic_to_square(field)?))
}

fn mark_moved_if(board: &mut Board, square: Square, kind: PieceKind, color: Color) {
    if let Some(piece) = board.piece_at_mut(square) {
        if piece.kind == kind && piece.color == color {
            piece.has_moved = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::{Color, PieceKind};
    use crate::game_state::game_state::STARTING_POSITION_FEN;

    #[test]
    fn parses_starting_position() -> Result<(), ChessErrors> {
        let state = parse_fen(STARTING_POSITION_FEN)?;
        assert_eq!(state.current_player, Color::White);
        assert_eq!(state.move_counter, 1);
        assert_eq!(state.half_move_counter, 1);
        assert_eq!(state.last_pawn_double_move, None);
        assert_eq!(state.board.pieces().count(), 32);
        assert!(state
            .board
            .pieces()
            .all(|(_, piece)| !piece.has_moved));
        Ok(())
    }

    #[test]
    fn castling_field_marks_rooks_and_kings_moved() -> Result<(), ChessErrors> {
        let state = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 10")?;
        let board = &state.board;
        // White: kingside right only, so a1 rook is marked moved.
        assert!(!board.piece_at((7, 7)).map_or(true, |p| p.has_moved));
        assert!(board.piece_at((7, 0)).map_or(false, |p| p.has_moved));
        assert!(!board.piece_at((7, 4)).map_or(true, |p| p.has_moved));
        // Black: queenside right only, so h8 rook is marked moved.
        assert!(board.piece_at((0, 7)).map_or(false, |p| p.has_moved));
        assert!(!board.piece_at((0, 0)).map_or(true, |p| p.has_moved));
        Ok(())
    }

    #[test]
    fn displaced_pawns_and_kings_are_marked_moved() -> Result<(), ChessErrors> {
        let state = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")?;
        let pawn = state.board.piece_at((4, 4)).ok_or(ChessErrors::InvalidSquare((4, 4)))?;
        assert_eq!(pawn.kind, PieceKind::Pawn);
        assert!(pawn.has_moved);
        Ok(())
    }

    #[test]
    fn derives_half_move_counter_from_fullmove_and_side() -> Result<(), ChessErrors> {
        let white_to_move = parse_fen("8/8/8/4k3/8/4K3/8/8 w - - 0 5")?;
        assert_eq!(white_to_move.half_move_counter, 9);
        let black_to_move = parse_fen("8/8/8/4k3/8/4K3/8/8 b - - 0 5")?;
        assert_eq!(black_to_move.half_move_counter, 10);
        Ok(())
    }

    #[test]
    fn rejects_malformed_fen() {
        assert!(parse_fen("only three fields").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1").is_err());
        assert!(parse_fen("rnbqkbnr/ppppppp1/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1").is_err());
    }
}
