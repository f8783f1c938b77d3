//! The complete game position plus the bookkeeping the draw rules need.

use std::collections::HashMap;

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::notation::fen_generator::generate_fen;
use crate::notation::fen_parser::parse_fen;

pub const STARTING_POSITION_FEN: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Board plus metadata. Mutated only by the move executor's commit step and
/// by snapshot restoration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    /// Destination square of the most recent two-square pawn advance.
    /// Valid for exactly one subsequent ply (the en-passant window).
    pub last_pawn_double_move: Option<Square>,
    /// Per-ply count, starting at 1.
    pub half_move_counter: u32,
    /// Full-move count, starting at 1, incremented when it becomes White's turn.
    pub move_counter: u32,
    /// Occurrence count per position key, for threefold repetition.
    pub position_history: HashMap<String, u32>,
}

impl GameState {
    /// The standard initial position with White to move.
    pub fn new_game() -> Self {
        GameState {
            board: Board::standard(),
            current_player: Color::White,
            last_pawn_double_move: None,
            half_move_counter: 1,
            move_counter: 1,
            position_history: HashMap::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        parse_fen(fen)
    }

    pub fn fen(&self) -> String {
        generate_fen(self)
    }
}
