//! The committing side of the engine: a `Game` owns the live state, the
//! legal-move cache, the undo stack, and the move log, and is the only
//! place a position is ever mutated in place.
//!
//! Commit order is load-bearing: notation is rendered before the board
//! changes (capture and disambiguation read the origin), the position key
//! is recorded before the turn flips, and the cache is rebuilt exactly once
//! per commit and once per revert.

use crate::chess_errors::ChessErrors;
use crate::draw::material::is_insufficient_material;
use crate::draw::repetition::{is_threefold, record};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::game_state::snapshot::Snapshot;
use crate::notation::move_notation::{describe_move, status_suffix};
use crate::rules::check_detector::is_in_check;
use crate::rules::legal_move_cache::LegalMoveCache;
use crate::state_machine::machine_state::MachineState;

pub struct Game {
    state: GameState,
    cache: LegalMoveCache,
    machine_state: MachineState,
    undo_stack: Vec<Snapshot>,
    move_log: Vec<String>,
}

impl Game {
    pub fn new() -> Result<Self, ChessErrors> {
        Self::from_state(GameState::new_game())
    }

    pub fn from_fen(fen: &str) -> Result<Self, ChessErrors> {
        Self::from_state(GameState::from_fen(fen)?)
    }

    fn from_state(state: GameState) -> Result<Self, ChessErrors> {
        let cache = LegalMoveCache::recompute(&state)?;
        let machine_state = classify(&state, &cache, None)?;
        Ok(Game {
            state,
            cache,
            machine_state,
            undo_stack: Vec::new(),
            move_log: Vec::new(),
        })
    }

    /// Attempt to commit a move. `Ok(false)` is an ordinary rejection with
    /// the game left untouched; errors are reserved for structural trouble
    /// such as a missing king.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<bool, ChessErrors> {
        if self.machine_state.is_terminal() {
            return Ok(false);
        }

        self.undo_stack.push(Snapshot::capture(&self.state));
        if !self.cache.contains(from, to) {
            self.undo_stack.pop();
            return Ok(false);
        }

        let notation = describe_move(&self.state, from, to)?;
        apply_board_effects(&mut self.state, from, to)?;
        let key = record(&mut self.state);
        advance_turn(&mut self.state);

        self.cache = LegalMoveCache::recompute(&self.state)?;
        self.machine_state = classify(&self.state, &self.cache, Some(&key))?;
        self.move_log
            .push(format!("{}{}", notation, status_suffix(self.machine_state)));
        Ok(true)
    }

    /// Pop the most recent snapshot and reinstate it wholesale. Returns
    /// `Ok(false)` when there is nothing to undo. Reverting out of a
    /// terminal state resumes play.
    pub fn revert_move(&mut self) -> Result<bool, ChessErrors> {
        let Some(snapshot) = self.undo_stack.pop() else {
            return Ok(false);
        };
        self.state = snapshot.restore();
        self.cache = LegalMoveCache::recompute(&self.state)?;
        self.machine_state = classify(&self.state, &self.cache, None)?;
        self.move_log.pop();
        Ok(true)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn machine_state(&self) -> MachineState {
        self.machine_state
    }

    pub fn legal_moves(&self) -> &LegalMoveCache {
        &self.cache
    }

    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn fen(&self) -> String {
        self.state.fen()
    }
}

/// Current classification of `state`, given its freshly rebuilt cache.
/// `committed_key` is the position key recorded by the move that produced
/// this state, when there was one; repetition is only judged at commit.
fn classify(
    state: &GameState,
    cache: &LegalMoveCache,
    committed_key: Option<&str>,
) -> Result<MachineState, ChessErrors> {
    let in_check = is_in_check(
        &state.board,
        state.last_pawn_double_move,
        state.current_player,
    )?;

    if !cache.has_any_move() {
        return Ok(if in_check {
            MachineState::Checkmate(state.current_player)
        } else {
            MachineState::Stalemate
        });
    }
    if let Some(key) = committed_key {
        if is_threefold(state, key) {
            return Ok(MachineState::DrawRepetition);
        }
    }
    if is_insufficient_material(&state.board) {
        return Ok(MachineState::DrawInsufficientMaterial);
    }
    Ok(if in_check {
        MachineState::Check(state.current_player)
    } else {
        MachineState::Active
    })
}

/// All board-level consequences of a validated move: the en-passant window
/// close/open, the en-passant victim removal, the castling rook hop,
/// auto-queen promotion, and the mover's relocation with `has_moved` set.
pub fn apply_board_effects(
    state: &mut GameState,
    from: Square,
    to: Square,
) -> Result<(), ChessErrors> {
    let mut piece = state
        .board
        .piece_at(from)
        .copied()
        .ok_or(ChessErrors::InvalidSquare(from))?;

    let ep_window = state.last_pawn_double_move.take();

    if piece.kind == PieceKind::Pawn
        && from.1 != to.1
        && state.board.piece_at(to).is_none()
        && ep_window == Some((from.0, to.1))
    {
        state.board.clear((from.0, to.1));
    }

    if piece.kind == PieceKind::Pawn && (to.0 as i8 - from.0 as i8).abs() == 2 {
        state.last_pawn_double_move = Some(to);
    }

    if piece.kind == PieceKind::King && (to.1 as i8 - from.1 as i8).abs() == 2 {
        let row = from.0;
        let (rook_from, rook_to) = if to.1 > from.1 {
            ((row, 7), (row, 5))
        } else {
            ((row, 0), (row, 3))
        };
        if let Some(mut rook) = state.board.clear(rook_from) {
            rook.has_moved = true;
            state.board.place(rook_to, rook);
        }
    }

    piece.has_moved = true;
    if piece.kind == PieceKind::Pawn && to.0 == piece.color.promotion_row() {
        piece = Piece {
            kind: PieceKind::Queen,
            color: piece.color,
            has_moved: true,
        };
    }
    state.board.clear(from);
    state.board.place(to, piece);
    Ok(())
}

/// Hand the move to the other side and advance both counters. The
/// full-move counter ticks when the turn comes back to White.
pub fn advance_turn(state: &mut GameState) {
    state.current_player = state.current_player.opposite();
    state.half_move_counter += 1;
    if state.current_player == Color::White {
        state.move_counter += 1;
    }
}

/// Validation-free apply for callers that already know the move is legal,
/// such as search working on a cloned state. Position history is not
/// touched; speculative lines never count toward repetition.
pub fn apply_move(state: &mut GameState, from: Square, to: Square) -> Result<(), ChessErrors> {
    apply_board_effects(state, from, to)?;
    advance_turn(state);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_state::STARTING_POSITION_FEN;
    use crate::utils::algebraic::algebraic_to_square as sq;

    fn play(game: &mut Game, from: &str, to: &str) -> Result<bool, ChessErrors> {
        game.try_move(sq(from)?, sq(to)?)
    }

    #[test]
    fn commits_a_simple_opening_and_logs_it() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        assert!(play(&mut game, "e2", "e4")?);
        assert!(play(&mut game, "e7", "e5")?);
        assert!(play(&mut game, "g1", "f3")?);
        assert_eq!(game.move_log(), ["e4", "e5", "Nf3"]);
        assert_eq!(game.state().move_counter, 2);
        assert_eq!(game.state().half_move_counter, 4);
        assert_eq!(game.machine_state(), MachineState::Active);
        Ok(())
    }

    #[test]
    fn rejections_leave_no_trace() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        let fen_before = game.fen();
        assert!(!play(&mut game, "e2", "e5")?);
        assert!(!play(&mut game, "e7", "e5")?);
        assert_eq!(game.fen(), fen_before);
        assert!(game.move_log().is_empty());
        assert!(!game.revert_move()?);
        Ok(())
    }

    #[test]
    fn double_step_opens_the_en_passant_window_for_one_ply() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        assert!(play(&mut game, "e2", "e4")?);
        assert_eq!(game.state().last_pawn_double_move, Some(sq("e4")?));
        assert!(play(&mut game, "g8", "f6")?);
        assert_eq!(game.state().last_pawn_double_move, None);
        Ok(())
    }

    #[test]
    fn en_passant_capture_removes_the_doubled_pawn() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1")?;
        assert!(play(&mut game, "e2", "e4")?);
        assert!(play(&mut game, "d4", "e3")?);
        assert!(game.state().board.piece_at(sq("e4")?).is_none());
        assert_eq!(game.move_log().last().map(String::as_str), Some("dxe3"));
        Ok(())
    }

    #[test]
    fn castling_moves_the_rook_too() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")?;
        assert!(play(&mut game, "e1", "g1")?);
        let rook = game
            .state()
            .board
            .piece_at(sq("f1")?)
            .ok_or(ChessErrors::InvalidSquare((7, 5)))?;
        assert_eq!(rook.kind, PieceKind::Rook);
        assert!(rook.has_moved);
        assert!(game.state().board.piece_at(sq("h1")?).is_none());
        assert_eq!(game.move_log().last().map(String::as_str), Some("O-O"));
        Ok(())
    }

    #[test]
    fn promotion_always_yields_a_queen() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("8/1P5k/8/8/8/8/8/4K3 w - - 0 1")?;
        assert!(play(&mut game, "b7", "b8")?);
        let queen = game
            .state()
            .board
            .piece_at(sq("b8")?)
            .ok_or(ChessErrors::InvalidSquare((0, 1)))?;
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.color, Color::White);
        assert_eq!(game.move_log().last().map(String::as_str), Some("b8=Q"));
        Ok(())
    }

    #[test]
    fn scholars_mate_is_detected_and_locks_the_game() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        for (from, to) in [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ] {
            assert!(play(&mut game, from, to)?);
        }
        assert_eq!(game.machine_state(), MachineState::Checkmate(Color::Black));
        assert_eq!(game.move_log().last().map(String::as_str), Some("Qxf7#"));
        assert!(!play(&mut game, "e8", "f7")?);
        Ok(())
    }

    #[test]
    fn fools_mate_checkmates_white() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            assert!(play(&mut game, from, to)?);
        }
        assert_eq!(game.machine_state(), MachineState::Checkmate(Color::White));
        assert_eq!(game.move_log().last().map(String::as_str), Some("Qh4#"));
        assert!(!game.legal_moves().has_any_move());
        Ok(())
    }

    #[test]
    fn stalemate_is_a_draw() -> Result<(), ChessErrors> {
        // Kf6-g6 leaves the cornered king unchecked but out of moves.
        let mut game = Game::from_fen("7k/5Q2/5K2/8/8/8/8/8 w - - 0 1")?;
        assert!(play(&mut game, "f6", "g6")?);
        assert_eq!(game.machine_state(), MachineState::Stalemate);
        assert!(!play(&mut game, "h8", "h7")?);
        Ok(())
    }

    #[test]
    fn threefold_shuffle_draws_the_game() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/R7/4K3 w - - 0 1")?;
        for _ in 0..2 {
            assert!(play(&mut game, "a2", "a3")?);
            assert!(play(&mut game, "e8", "d8")?);
            assert!(play(&mut game, "a3", "a2")?);
            assert!(play(&mut game, "d8", "e8")?);
        }
        assert!(play(&mut game, "a2", "a3")?);
        assert_eq!(game.machine_state(), MachineState::DrawRepetition);
        Ok(())
    }

    #[test]
    fn capturing_down_to_bare_kings_draws() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("4k3/8/8/8/8/8/3r4/3QK3 b - - 0 1")?;
        assert!(play(&mut game, "d2", "d1")?);
        assert_eq!(game.machine_state(), MachineState::Check(Color::White));
        assert!(play(&mut game, "e1", "d1")?);
        assert_eq!(
            game.machine_state(),
            MachineState::DrawInsufficientMaterial
        );
        Ok(())
    }

    #[test]
    fn revert_restores_the_exact_previous_position() -> Result<(), ChessErrors> {
        let mut game = Game::new()?;
        assert!(play(&mut game, "e2", "e4")?);
        assert!(play(&mut game, "d7", "d5")?);
        assert!(play(&mut game, "e4", "d5")?);
        assert!(game.revert_move()?);
        assert!(game.revert_move()?);
        assert!(game.revert_move()?);
        assert_eq!(game.fen(), STARTING_POSITION_FEN);
        assert!(game.move_log().is_empty());
        assert!(!game.revert_move()?);
        Ok(())
    }

    #[test]
    fn revert_reopens_a_finished_game() -> Result<(), ChessErrors> {
        let mut game = Game::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1")?;
        assert!(play(&mut game, "d1", "d8")?);
        assert_eq!(game.machine_state(), MachineState::Checkmate(Color::Black));
        assert!(game.revert_move()?);
        assert_eq!(game.machine_state(), MachineState::Active);
        assert!(play(&mut game, "d1", "d2")?);
        Ok(())
    }
}
