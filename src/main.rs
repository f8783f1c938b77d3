use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use quince_chess::advisory::cloud_eval::spawn_cloud_eval;
use quince_chess::chess_errors::ChessErrors;
use quince_chess::engines::engine_thread::{EngineThread, MinimaxEngineThread};
use quince_chess::game_state::chess_types::Color;
use quince_chess::state_machine::move_executor::Game;
use quince_chess::utils::algebraic::parse_long_move;
use quince_chess::utils::render_board::render_board;

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("fatal: {}", error);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ChessErrors> {
    println!(
        "quince_chess shell, started {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("You play White; the engine answers for Black. Type 'help' for commands.");

    let mut game = Game::new()?;
    let mut engine = MinimaxEngineThread::new();
    let mut depth: u32 = 2;
    let mut pending_advice: Option<mpsc::Receiver<Option<String>>> = None;

    println!("{}", render_board(&game.state().board));
    prompt();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };

        drain_advice(&mut pending_advice);

        let input = line.trim();
        if input.is_empty() {
            prompt();
            continue;
        }
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "new" => {
                game = Game::new()?;
                pending_advice = None;
                println!("{}", render_board(&game.state().board));
            }
            "depth" => match parts.next().and_then(|text| text.parse::<u32>().ok()) {
                Some(value) if (1..=4).contains(&value) => {
                    depth = value;
                    println!("search depth set to {}", depth);
                }
                _ => println!("usage: depth <1-4>"),
            },
            "fen" => println!("{}", game.fen()),
            "board" => println!("{}", render_board(&game.state().board)),
            "log" => print_log(&game),
            "hint" => {
                let receiver = spawn_cloud_eval(game.fen());
                match receiver.recv_timeout(Duration::from_secs(6)) {
                    Ok(Some(suggestion)) => println!("advisor suggests {}", suggestion),
                    _ => println!("no suggestion available"),
                }
            }
            "undo" => {
                // One pop per side, back to the user's turn.
                let mut popped = 0;
                while popped < 2 && game.revert_move()? {
                    popped += 1;
                }
                if popped == 0 {
                    println!("nothing to undo");
                } else {
                    println!("{}", render_board(&game.state().board));
                }
            }
            _ => match parse_long_move(input) {
                Ok((from, to)) => {
                    play_user_move(&mut game, &mut engine, depth, from, to, &mut pending_advice)?;
                }
                Err(_) => println!("unrecognized command; type 'help'"),
            },
        }

        prompt();
    }

    Ok(())
}

fn play_user_move(
    game: &mut Game,
    engine: &mut MinimaxEngineThread,
    depth: u32,
    from: (u8, u8),
    to: (u8, u8),
    pending_advice: &mut Option<mpsc::Receiver<Option<String>>>,
) -> Result<(), ChessErrors> {
    if game.machine_state().is_terminal() {
        println!("game over: {}", game.machine_state());
        return Ok(());
    }
    if !game.try_move(from, to)? {
        println!("illegal move");
        return Ok(());
    }
    report_commit(game);
    *pending_advice = Some(spawn_cloud_eval(game.fen()));

    if game.machine_state().is_terminal() || game.state().current_player != Color::Black {
        return Ok(());
    }

    engine.setup(game.state(), depth, None);
    engine.start_searching();
    println!("engine is thinking...");
    while engine.is_busy() {
        engine.poll();
        thread::sleep(Duration::from_millis(10));
    }

    match engine.best_move() {
        Some((reply_from, reply_to)) => {
            if game.try_move(reply_from, reply_to)? {
                report_commit(game);
            } else {
                log::error!("engine proposed a rejected move");
            }
        }
        None => println!("engine has no reply: {}", game.machine_state()),
    }
    Ok(())
}

fn report_commit(game: &Game) {
    if let Some(notation) = game.move_log().last() {
        log::info!("committed {}", notation);
        println!("played {}", notation);
    }
    println!("{}", render_board(&game.state().board));
    if game.machine_state().is_terminal() {
        log::info!("game over: {}", game.machine_state());
        println!("game over: {}", game.machine_state());
    }
}

fn drain_advice(pending_advice: &mut Option<mpsc::Receiver<Option<String>>>) {
    if let Some(receiver) = pending_advice {
        match receiver.try_recv() {
            Ok(Some(suggestion)) => {
                println!("advisor suggests {}", suggestion);
                *pending_advice = None;
            }
            Ok(None) | Err(mpsc::TryRecvError::Disconnected) => {
                *pending_advice = None;
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }
    }
}

fn print_log(game: &Game) {
    if game.move_log().is_empty() {
        println!("no moves yet");
        return;
    }
    for (index, pair) in game.move_log().chunks(2).enumerate() {
        match pair {
            [white, black] => println!("{}. {} {}", index + 1, white, black),
            [white] => println!("{}. {}", index + 1, white),
            _ => {}
        }
    }
}

fn print_help() {
    println!("commands:");
    println!("  e2e4        move a piece (long algebraic, e7e8q to promote)");
    println!("  undo        take back the last full round");
    println!("  new         start a fresh game");
    println!("  depth <n>   set engine search depth (1-4)");
    println!("  board       redraw the board");
    println!("  fen         print the position as FEN");
    println!("  log         print the move list");
    println!("  hint        ask the advisory service for a suggestion");
    println!("  quit        leave");
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
