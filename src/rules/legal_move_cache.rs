//! Cached legal-move map for the side to move.
//!
//! The cache is recomputed wholesale after every committed or reverted move
//! and is the single source callers consult: terminal detection, notation
//! disambiguation, and search all read from it instead of re-deriving
//! legality. BTreeMap keys give a stable, deterministic iteration order.

use std::collections::BTreeMap;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::rules::check_detector::evaluate_move_safety;
use crate::rules::move_validator::is_legal_geometry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoveCache {
    moves: BTreeMap<Square, Vec<Square>>,
}

impl LegalMoveCache {
    /// Full rebuild: every origin held by the side to move is tested against
    /// every destination, keeping only moves that pass both geometry and the
    /// king-safety simulation. Origins with no legal destination are omitted.
    pub fn recompute(state: &GameState) -> Result<Self, ChessErrors> {
        let mut moves: BTreeMap<Square, Vec<Square>> = BTreeMap::new();

        for (from, piece) in state.board.pieces() {
            if piece.color != state.current_player {
                continue;
            }
            let mut destinations = Vec::new();
            for row in 0..8u8 {
                for col in 0..8u8 {
                    let to = (row, col);
                    if !is_legal_geometry(state, from, to) {
                        continue;
                    }
                    if evaluate_move_safety(state, from, to, state.current_player)? {
                        destinations.push(to);
                    }
                }
            }
            if !destinations.is_empty() {
                moves.insert(from, destinations);
            }
        }

        Ok(LegalMoveCache { moves })
    }

    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.moves
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn destinations(&self, from: Square) -> &[Square] {
        self.moves.get(&from).map_or(&[], Vec::as_slice)
    }

    /// Whether the side to move has at least one legal move anywhere.
    pub fn has_any_move(&self) -> bool {
        !self.moves.is_empty()
    }

    pub fn origins(&self) -> impl Iterator<Item = Square> + '_ {
        self.moves.keys().copied()
    }

    /// All legal (from, to) pairs in deterministic board order.
    pub fn iter_moves(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.moves
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }
}
