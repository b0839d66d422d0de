//! Autoplay bot
//!
//! Reads snapshots like a player would: it aims for the readable word closest
//! to the bottom, solves math words from their rendered expression, and makes
//! a typo now and then.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::debug;

use typefall_engine::core::{GameSnapshot, SimpleRng, WordSnapshot};

use crate::driver::Driver;

/// Pause between two typed words
pub const DEFAULT_THINK_MS: u64 = 450;

#[derive(Debug, Clone)]
pub struct AutoTyper {
    rng: SimpleRng,
    miss_percent: u32,
}

impl AutoTyper {
    pub fn new(seed: u32, miss_percent: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            miss_percent: miss_percent.min(100),
        }
    }

    /// The lowest word whose text is visible
    pub fn target(snapshot: &GameSnapshot) -> Option<&WordSnapshot> {
        snapshot
            .words
            .iter()
            .filter(|w| !w.is_hidden)
            .max_by(|a, b| a.y.total_cmp(&b.y))
    }

    /// What to type next, if anything
    pub fn next_input(&mut self, snapshot: &GameSnapshot) -> Option<String> {
        if !snapshot.playable() {
            return None;
        }

        let word = Self::target(snapshot)?;
        let answer = if word.is_math {
            solve_expression(&word.text)?.to_string()
        } else {
            word.text.clone()
        };

        if self.rng.chance_percent(self.miss_percent) {
            Some(format!("{answer}?"))
        } else {
            Some(answer)
        }
    }
}

/// Evaluate `"a + b"` or `"a - b"`
pub fn solve_expression(expr: &str) -> Option<u32> {
    let mut parts = expr.split_whitespace();
    let a: u32 = parts.next()?.parse().ok()?;
    let op = parts.next()?;
    let b: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    match op {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        _ => None,
    }
}

/// Type into `driver` until game over or `limit` elapses.
///
/// Returns how many inputs were sent.
pub async fn autoplay(driver: &Driver, typer: &mut AutoTyper, think: Duration, limit: Duration) -> u32 {
    let deadline = Instant::now() + limit;
    let mut sent = 0;

    loop {
        time::sleep(think).await;
        if Instant::now() >= deadline || driver.is_finished() {
            break;
        }

        let snapshot = driver.snapshot();
        if snapshot.game_over() {
            break;
        }

        if let Some(input) = typer.next_input(&snapshot) {
            debug!(input = %input, "bot typing");
            if !driver.input(input).await {
                break;
            }
            sent += 1;
        }
    }

    sent
}
