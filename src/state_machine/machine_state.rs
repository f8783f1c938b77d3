//! Game status classification.

use std::fmt;

use crate::game_state::chess_types::Color;

/// Status of the live game after the most recent commit or revert.
/// Terminal variants refuse further moves; `Check` is informational and the
/// game continues. The color carried by `Check` and `Checkmate` is the side
/// whose king is attacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Active,
    Check(Color),
    Checkmate(Color),
    Stalemate,
    DrawRepetition,
    DrawInsufficientMaterial,
}

impl MachineState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MachineState::Active | MachineState::Check(_))
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineState::Active => write!(f, "active"),
            MachineState::Check(color) => write!(f, "{} is in check", color),
            MachineState::Checkmate(color) => {
                write!(f, "checkmate, {} wins", color.opposite())
            }
            MachineState::Stalemate => write!(f, "draw by stalemate"),
            MachineState::DrawRepetition => write!(f, "draw by threefold repetition"),
            MachineState::DrawInsufficientMaterial => {
                write!(f, "draw by insufficient material")
            }
        }
    }
}
