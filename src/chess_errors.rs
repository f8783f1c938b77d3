//! Errors used throughout the chess engine.
//!
//! `ChessErrors` is the single error type across the crate. Ordinary move
//! rejection is never an error (legality is a boolean predicate); the
//! variants here cover malformed input and structural invariant violations.

use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::Color;

/// Unified error type for the chess engine.
///
/// Parsing variants (`InvalidAlgebraicChar`, `InvalidAlgebraicString`,
/// `InvalidFenToken`, `InvalidFenForm`) are recoverable and suitable for
/// presenting to end users. `BoardDoesNotContainAKing` represents a
/// corrupted game state and should be treated as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessErrors {
    /// A single character used during algebraic parsing was invalid.
    InvalidAlgebraicChar(char),

    /// An algebraic string failed to parse as a square or move.
    InvalidAlgebraicString(String),

    /// Row or column indices outside 0..=7 were provided.
    InvalidSquare((u8, u8)),

    /// Found an unexpected token while parsing a FEN string.
    InvalidFenToken(char),

    /// A FEN string had malformed structure.
    InvalidFenForm(String),

    /// The board does not contain a king for the given side. This never
    /// occurs under correct operation; king captures are rejected before
    /// commit.
    BoardDoesNotContainAKing(Color),
}

impl fmt::Display for ChessErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessErrors::InvalidAlgebraicChar(ch) => {
                write!(f, "invalid algebraic character '{ch}'")
            }
            ChessErrors::InvalidAlgebraicString(text) => {
                write!(f, "invalid algebraic string \"{text}\"")
            }
            ChessErrors::InvalidSquare((row, col)) => {
                write!(f, "square ({row},{col}) is out of bounds")
            }
            ChessErrors::InvalidFenToken(ch) => write!(f, "invalid FEN token '{ch}'"),
            ChessErrors::InvalidFenForm(text) => write!(f, "malformed FEN string \"{text}\""),
            ChessErrors::BoardDoesNotContainAKing(color) => {
                write!(f, "board does not contain a {color} king")
            }
        }
    }
}

impl Error for ChessErrors {}
