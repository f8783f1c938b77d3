//! Conversions between algebraic coordinates and internal squares.
//!
//! Converts human-readable coordinates (e.g. `e4`) and long coordinate
//! moves (e.g. `e2e4`) to and from the `(row, col)` representation, where
//! row 0 is rank 8.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Square;

/// File letter for a column index, `0 -> 'a'`.
#[inline]
pub fn file_char(col: u8) -> char {
    char::from(b'a' + col)
}

/// Rank digit for a row index, `0 -> '8'`.
#[inline]
pub fn rank_char(row: u8) -> char {
    char::from(b'8' - row)
}

/// Convert algebraic notation (for example: "e4") to a square.
pub fn algebraic_to_square(text: &str) -> Result<Square, ChessErrors> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidAlgebraicString(text.to_string()));
    }

    let file = bytes[0];
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessErrors::InvalidAlgebraicChar(file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidAlgebraicChar(rank as char));
    }

    Ok((b'8' - rank, file - b'a'))
}

/// Convert a square to algebraic notation (for example: "e4").
pub fn square_to_algebraic(square: Square) -> Result<String, ChessErrors> {
    if square.0 > 7 || square.1 > 7 {
        return Err(ChessErrors::InvalidSquare(square));
    }
    Ok(format!("{}{}", file_char(square.1), rank_char(square.0)))
}

/// Parse a long coordinate move such as "e2e4". A trailing promotion letter
/// ("e7e8q") is accepted and discarded; promotion is always to a queen.
pub fn parse_long_move(text: &str) -> Result<(Square, Square), ChessErrors> {
    let text = text.trim();
    if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
        return Err(ChessErrors::InvalidAlgebraicString(text.to_string()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;

    if let Some(promo) = text.chars().nth(4) {
        if !matches!(promo, 'q' | 'r' | 'b' | 'n' | 'Q' | 'R' | 'B' | 'N') {
            return Err(ChessErrors::InvalidAlgebraicChar(promo));
        }
    }

    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, parse_long_move, square_to_algebraic};
    use crate::chess_errors::ChessErrors;

    #[test]
    fn round_trip_square_conversions() -> Result<(), ChessErrors> {
        assert_eq!(algebraic_to_square("a1")?, (7, 0));
        assert_eq!(algebraic_to_square("h8")?, (0, 7));
        assert_eq!(algebraic_to_square("e4")?, (4, 4));
        assert_eq!(square_to_algebraic((7, 0))?, "a1");
        assert_eq!(square_to_algebraic((0, 7))?, "h8");
        Ok(())
    }

    #[test]
    fn rejects_malformed_squares() {
        assert!(algebraic_to_square("i4").is_err());
        assert!(algebraic_to_square("a9").is_err());
        assert!(algebraic_to_square("e44").is_err());
        assert!(square_to_algebraic((8, 0)).is_err());
    }

    #[test]
    fn parses_long_moves_with_optional_promotion() -> Result<(), ChessErrors> {
        assert_eq!(parse_long_move("e2e4")?, ((6, 4), (4, 4)));
        assert_eq!(parse_long_move("e7e8q")?, ((1, 4), (0, 4)));
        assert!(parse_long_move("e2").is_err());
        assert!(parse_long_move("e7e8x").is_err());
        Ok(())
    }
}
