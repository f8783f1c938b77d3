//! Fire-and-forget advisory position lookup.
//!
//! After a move commits, the shell may ask an external evaluation service
//! for a suggested continuation. The query runs on its own thread, never
//! blocks or gates the move sequence, and collapses every failure mode
//! (network, HTTP status, body shape) into `None`. The suggestion is the
//! leading move of the first principal variation, in coordinate notation.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const CLOUD_EVAL_URL: &str = "https://lichess.org/api/cloud-eval";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Kick off an advisory lookup for `fen`. The receiver yields exactly one
/// message: `Some(move)` in coordinate notation such as `e2e4`, or `None`
/// when the service had nothing usable.
pub fn spawn_cloud_eval(fen: String) -> mpsc::Receiver<Option<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let suggestion = fetch_suggestion(&fen);
        // Receiver may already be gone; the result is only advisory.
        let _ = sender.send(suggestion);
    });
    receiver
}

fn fetch_suggestion(fen: &str) -> Option<String> {
    let client = match reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(error) => {
            log::warn!("advisory client unavailable: {}", error);
            return None;
        }
    };

    let response = match client
        .get(CLOUD_EVAL_URL)
        .query(&[("fen", fen), ("multiPv", "1")])
        .send()
    {
        Ok(response) => response,
        Err(error) => {
            log::warn!("advisory lookup failed: {}", error);
            return None;
        }
    };

    if !response.status().is_success() {
        log::warn!("advisory lookup refused: {}", response.status());
        return None;
    }

    let body: serde_json::Value = match response.json() {
        Ok(body) => body,
        Err(error) => {
            log::warn!("advisory response unreadable: {}", error);
            return None;
        }
    };

    first_move_of_first_pv(&body)
}

/// The service reports principal variations as space-separated coordinate
/// moves; the suggestion is the first token of the first one.
fn first_move_of_first_pv(body: &serde_json::Value) -> Option<String> {
    body.get("pvs")?
        .get(0)?
        .get("moves")?
        .as_str()?
        .split_whitespace()
        .next()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_leading_move() {
        let body = serde_json::json!({
            "fen": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "pvs": [
                { "moves": "e2e4 e7e5 g1f3", "cp": 30 },
                { "moves": "d2d4 d7d5", "cp": 25 }
            ]
        });
        assert_eq!(
            first_move_of_first_pv(&body),
            Some("e2e4".to_owned())
        );
    }

    #[test]
    fn malformed_bodies_yield_nothing() {
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "pvs": [] }),
            serde_json::json!({ "pvs": [{ "cp": 30 }] }),
            serde_json::json!({ "pvs": [{ "moves": "" }] }),
            serde_json::json!({ "pvs": [{ "moves": 42 }] }),
        ] {
            assert_eq!(first_move_of_first_pv(&body), None);
        }
    }
}
