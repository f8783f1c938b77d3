//! Depth-limited minimax with alpha-beta pruning.
//!
//! Black is the maximizing side throughout: leaves are evaluated from
//! Black's perspective and the root picks the maximum. Speculative lines
//! run on cloned states, so nothing is ever undone on the caller's
//! position. Ties at the root are broken uniformly at random; a fixed seed
//! reproduces the same choice.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{Color, Square};
use crate::game_state::game_state::GameState;
use crate::rules::legal_move_cache::LegalMoveCache;
use crate::search::board_scoring::{evaluate, Score, MAX_SCORE, MIN_SCORE};
use crate::state_machine::move_executor::apply_move;

/// Score `state` by searching `depth` plies ahead. `maximizing` says whose
/// turn the current node represents in the Black-maximizes convention. A
/// node with no legal moves is lost for the side to move there, covering
/// both mate and the stalemate approximation this engine accepts.
pub fn minimax(
    state: &GameState,
    depth: u32,
    mut alpha: Score,
    mut beta: Score,
    maximizing: bool,
) -> Result<Score, ChessErrors> {
    if depth == 0 {
        return Ok(evaluate(state, Color::Black));
    }

    let cache = LegalMoveCache::recompute(state)?;
    if !cache.has_any_move() {
        return Ok(if maximizing { MIN_SCORE } else { MAX_SCORE });
    }

    let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };
    for (from, to) in cache.iter_moves() {
        let mut child = state.clone();
        apply_move(&mut child, from, to)?;
        let score = minimax(&child, depth - 1, alpha, beta, !maximizing)?;

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(best);
        } else {
            best = best.min(score);
            beta = beta.min(best);
        }
        if beta <= alpha {
            break;
        }
    }
    Ok(best)
}

/// Pick Black's best move from `state`, searching `depth` plies. All moves
/// sharing the top score are candidates and one is chosen uniformly at
/// random, seeded when `seed` is given. `Ok(None)` means Black has no legal
/// move at all.
pub fn find_best_move(
    state: &GameState,
    depth: u32,
    seed: Option<u64>,
) -> Result<Option<(Square, Square)>, ChessErrors> {
    let cache = LegalMoveCache::recompute(state)?;
    let mut best = MIN_SCORE;
    let mut candidates: Vec<(Square, Square)> = Vec::new();

    for (from, to) in cache.iter_moves() {
        let mut child = state.clone();
        apply_move(&mut child, from, to)?;
        let score = minimax(
            &child,
            depth.saturating_sub(1),
            MIN_SCORE,
            MAX_SCORE,
            false,
        )?;
        if score > best {
            best = score;
            candidates.clear();
        }
        if score == best {
            candidates.push((from, to));
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Ok(candidates.choose(&mut rng).copied())
}
