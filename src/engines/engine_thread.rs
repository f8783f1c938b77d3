//! Background search worker with a busy/idle signal.
//!
//! The shell hands a position to the engine, starts a search, and keeps
//! polling while doing its own work; the worker thread posts its result
//! over a channel when finished. `poll` must be called to drain that
//! channel, since nothing here blocks.

use std::sync::mpsc;
use std::thread;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Square;
use crate::game_state::game_state::GameState;
use crate::search::minimax::find_best_move;

type SearchOutcome = Result<Option<(Square, Square)>, ChessErrors>;

/// Minimal engine-thread interface: prepare a position, kick off a search,
/// poll until the busy flag drops, then read the chosen move.
pub trait EngineThread {
    fn new() -> Self
    where
        Self: Sized;

    /// Store the position to search and the search parameters, clearing any
    /// previous result.
    fn setup(&mut self, state: &GameState, depth: u32, seed: Option<u64>);

    /// Begin searching in the background. No-op while already busy.
    fn start_searching(&mut self);

    /// Drain any finished result from the worker. Cheap; call it every tick.
    fn poll(&mut self);

    /// True from `start_searching` until the worker's result has been
    /// collected by `poll`.
    fn is_busy(&self) -> bool;

    /// The move chosen by the last completed search, if the searched side
    /// had one.
    fn best_move(&self) -> Option<(Square, Square)>;
}

pub struct MinimaxEngineThread {
    position: Option<GameState>,
    depth: u32,
    seed: Option<u64>,
    searching: bool,
    result: Option<(Square, Square)>,
    receiver: Option<mpsc::Receiver<SearchOutcome>>,
}

impl EngineThread for MinimaxEngineThread {
    fn new() -> Self {
        MinimaxEngineThread {
            position: None,
            depth: 2,
            seed: None,
            searching: false,
            result: None,
            receiver: None,
        }
    }

    fn setup(&mut self, state: &GameState, depth: u32, seed: Option<u64>) {
        self.position = Some(state.clone());
        self.depth = depth;
        self.seed = seed;
        self.result = None;
        self.receiver = None;
    }

    fn start_searching(&mut self) {
        if self.searching {
            return;
        }
        let Some(position) = self.position.clone() else {
            log::warn!("search requested before a position was set up");
            return;
        };

        let depth = self.depth;
        let seed = self.seed;
        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);
        self.searching = true;

        thread::spawn(move || {
            let outcome = find_best_move(&position, depth, seed);
            // The shell may have moved on; a dead receiver is fine.
            let _ = sender.send(outcome);
        });
    }

    fn poll(&mut self) {
        let Some(receiver) = &self.receiver else {
            return;
        };
        match receiver.try_recv() {
            Ok(Ok(found)) => {
                self.result = found;
                self.searching = false;
                self.receiver = None;
            }
            Ok(Err(error)) => {
                log::error!("search failed: {}", error);
                self.result = None;
                self.searching = false;
                self.receiver = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("search worker vanished without a result");
                self.searching = false;
                self.receiver = None;
            }
        }
    }

    fn is_busy(&self) -> bool {
        self.searching
    }

    fn best_move(&self) -> Option<(Square, Square)> {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn poll_until_idle(engine: &mut MinimaxEngineThread) {
        for _ in 0..500 {
            engine.poll();
            if !engine.is_busy() {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("engine never went idle");
    }

    #[test]
    fn busy_flag_drops_and_a_move_arrives() -> Result<(), ChessErrors> {
        let state = GameState::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        )?;
        let mut engine = MinimaxEngineThread::new();
        engine.setup(&state, 2, Some(7));
        assert!(!engine.is_busy());

        engine.start_searching();
        assert!(engine.is_busy());
        poll_until_idle(&mut engine);
        assert!(engine.best_move().is_some());
        Ok(())
    }

    #[test]
    fn mated_position_reports_no_move() -> Result<(), ChessErrors> {
        let state = GameState::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1")?;
        let mut engine = MinimaxEngineThread::new();
        engine.setup(&state, 2, Some(7));
        engine.start_searching();
        poll_until_idle(&mut engine);
        assert_eq!(engine.best_move(), None);
        Ok(())
    }

    #[test]
    fn setup_clears_the_previous_result() -> Result<(), ChessErrors> {
        let state = GameState::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
        )?;
        let mut engine = MinimaxEngineThread::new();
        engine.setup(&state, 1, Some(7));
        engine.start_searching();
        poll_until_idle(&mut engine);
        assert!(engine.best_move().is_some());

        engine.setup(&state, 1, Some(7));
        assert_eq!(engine.best_move(), None);
        Ok(())
    }
}
