//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the falling-word rules: the field, spawn policy,
//! scoring, the effect state machine and stage progression. It has no
//! dependencies on timers, rendering or I/O, so it can be:
//!
//! - **Deterministic**: same seed and the same sequence of calls produce the same game
//! - **Testable**: every rule is driven by plain method calls
//! - **Portable**: runs headless, in a tokio driver, or in a benchmark
//!
//! # Module Structure
//!
//! - [`field`]: words, landmines, movement, collisions, bomb timers
//! - [`spawn`]: free-lane selection, special/math/bomb word generation
//! - [`keystroke`]: 2-set Korean keyboard stroke counting
//! - [`scoring`]: points, mileage, play-time formatting
//! - [`effect`]: the single active effect and its activation/expiry tables
//! - [`stage`]: stage number, life pool, quota, stage-clear countdown
//! - [`game_state`]: the session aggregate and its tick entry points
//! - [`snapshot`]: read-only views for presentation
//! - [`rng`]: seedable LCG
//!
//! # Example
//!
//! ```
//! use typefall_core::{GameState, Word};
//! use typefall_core::types::{StageConfig, TICK_MS};
//!
//! let mut game = GameState::new(12345);
//! game.start(1);
//! game.load_stage(
//!     vec!["apple".to_string()],
//!     StageConfig::sanitized(10.0, 2.0, None, None),
//! );
//!
//! game.insert_word(Word::new(0, "apple", 3).at(120.0));
//! game.movement_tick(TICK_MS);
//!
//! let outcome = game.submit_input("apple");
//! assert_eq!(outcome.matched, 1);
//! assert_eq!(game.score(), 50);
//! ```
//!
//! # Timing
//!
//! The core never reads a clock. A scheduler calls:
//! - [`GameState::movement_tick`] every 50ms
//! - [`GameState::spawn_tick`] at the stage's spawn interval
//! - [`GameState::effect_tick`] every second

pub mod effect;
pub mod field;
pub mod game_state;
pub mod keystroke;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod spawn;
pub mod stage;

pub use typefall_types as types;

// Re-export commonly used types for convenience
pub use effect::{Countdown, EffectState};
pub use field::{Landmine, Word};
pub use game_state::{GameEvent, GameState, MatchOutcome, TickOutcome};
pub use keystroke::keystroke_cost;
pub use rng::SimpleRng;
pub use scoring::{format_play_time, mileage, word_score};
pub use snapshot::{EffectSnapshot, GameSnapshot, WordSnapshot};
pub use stage::ClearRule;
