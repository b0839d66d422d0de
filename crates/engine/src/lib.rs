//! Engine - scheduling and session orchestration
//!
//! Sits between the pure simulation in `typefall-core` and whatever drives
//! time (a tokio runtime, a test, a benchmark):
//!
//! - [`scheduler`]: movement, spawn and effect timers over elapsed time
//! - [`sources`]: collaborator traits (word source, stage config source, score sink)
//! - [`session`]: a game wired to its collaborators
//! - [`config`]: session tuning
//!
//! # Example
//!
//! ```
//! use typefall_engine::{EngineConfig, MemoryCatalog, MemoryScoreSink, Session};
//! use typefall_engine::types::StageConfig;
//!
//! let catalog = MemoryCatalog::new().with_stage(
//!     1,
//!     vec!["apple".to_string()],
//!     StageConfig::sanitized(10.0, 2.0, None, None),
//! );
//!
//! let mut session = Session::new(
//!     EngineConfig::new("player-1"),
//!     &catalog,
//!     &catalog,
//!     MemoryScoreSink::default(),
//! );
//! session.start();
//!
//! let report = session.advance(1_000);
//! assert_eq!(report.movement_ticks, 20);
//! assert_eq!(report.spawned, 1);
//! ```

pub mod config;
pub mod scheduler;
pub mod session;
pub mod sources;

pub use typefall_core as core;
pub use typefall_types as types;

pub use config::EngineConfig;
pub use scheduler::{IntervalTimer, Scheduler, TickReport};
pub use session::Session;
pub use sources::{
    GameResult, MemoryCatalog, MemoryScoreSink, ScoreSink, SourceError, SourceResult,
    StageConfigSource, WordSource,
};
