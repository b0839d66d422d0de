//! Collaborators the session consumes: word lists, stage tuning, result hand-off
//!
//! The engine only sees these traits. File-backed implementations live in the
//! runtime crate; the in-memory ones here back tests and the built-in catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use typefall_core::scoring::{format_play_time, mileage};
use typefall_core::GameState;
use typefall_types::StageConfig;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No data for stage {0}")]
    UnknownStage(u32),

    #[error("Invalid record: {0}")]
    Invalid(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Pool of candidate words for a stage
pub trait WordSource {
    fn fetch_words(&self, stage: u32) -> SourceResult<Vec<String>>;
}

/// Per-stage tuning.
///
/// `Ok(None)` means the record exists but its timing is unusable.
pub trait StageConfigSource {
    fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>>;
}

/// Receives the final result once per game over
pub trait ScoreSink {
    fn submit_result(&mut self, result: &GameResult) -> SourceResult<()>;
}

/// Final result handed to a [`ScoreSink`]
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub player_id: String,
    pub score: u64,
    pub stage: u32,
    pub play_time_ms: u64,
    /// Play time formatted as `MM:SS.d`
    pub play_at: String,
}

impl GameResult {
    pub fn from_state(player_id: impl Into<String>, state: &GameState) -> Self {
        Self {
            player_id: player_id.into(),
            score: state.score(),
            stage: state.stage(),
            play_time_ms: state.total_elapsed_ms(),
            play_at: format_play_time(state.total_elapsed_ms()),
        }
    }

    pub fn mileage(&self) -> f64 {
        mileage(self.score)
    }
}

/// Stage data held in memory.
///
/// Lookups for a stage past the last defined one use the last stage, so a
/// short catalog still supports an endless run.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    stages: BTreeMap<u32, (Vec<String>, Option<StageConfig>)>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(
        mut self,
        stage: u32,
        words: Vec<String>,
        config: Option<StageConfig>,
    ) -> Self {
        self.insert(stage, words, config);
        self
    }

    pub fn insert(&mut self, stage: u32, words: Vec<String>, config: Option<StageConfig>) {
        self.stages.insert(stage, (words, config));
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn last_stage(&self) -> Option<u32> {
        self.stages.keys().next_back().copied()
    }

    fn lookup(&self, stage: u32) -> SourceResult<&(Vec<String>, Option<StageConfig>)> {
        self.stages
            .range(..=stage)
            .next_back()
            .map(|(_, entry)| entry)
            .ok_or(SourceError::UnknownStage(stage))
    }
}

impl WordSource for MemoryCatalog {
    fn fetch_words(&self, stage: u32) -> SourceResult<Vec<String>> {
        self.lookup(stage).map(|(words, _)| words.clone())
    }
}

impl StageConfigSource for MemoryCatalog {
    fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>> {
        self.lookup(stage).map(|(_, config)| *config)
    }
}

/// Keeps every submitted result
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreSink {
    pub results: Vec<GameResult>,
}

impl ScoreSink for MemoryScoreSink {
    fn submit_result(&mut self, result: &GameResult) -> SourceResult<()> {
        self.results.push(result.clone());
        Ok(())
    }
}

impl<T: WordSource + ?Sized> WordSource for &T {
    fn fetch_words(&self, stage: u32) -> SourceResult<Vec<String>> {
        (**self).fetch_words(stage)
    }
}

impl<T: StageConfigSource + ?Sized> StageConfigSource for &T {
    fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>> {
        (**self).fetch_stage_config(stage)
    }
}

impl<T: WordSource + ?Sized> WordSource for Arc<T> {
    fn fetch_words(&self, stage: u32) -> SourceResult<Vec<String>> {
        (**self).fetch_words(stage)
    }
}

impl<T: StageConfigSource + ?Sized> StageConfigSource for Arc<T> {
    fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>> {
        (**self).fetch_stage_config(stage)
    }
}

impl<T: ScoreSink + ?Sized> ScoreSink for Box<T> {
    fn submit_result(&mut self, result: &GameResult) -> SourceResult<()> {
        (**self).submit_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_catalog_falls_back_to_last_lower_stage() {
        let cfg = StageConfig::sanitized(10.0, 2.0, None, None);
        let catalog = MemoryCatalog::new()
            .with_stage(1, words(&["a"]), cfg)
            .with_stage(3, words(&["c"]), cfg);

        assert_eq!(catalog.fetch_words(1).unwrap(), words(&["a"]));
        assert_eq!(catalog.fetch_words(2).unwrap(), words(&["a"]));
        assert_eq!(catalog.fetch_words(9).unwrap(), words(&["c"]));
        assert_eq!(catalog.last_stage(), Some(3));
    }

    #[test]
    fn test_catalog_unknown_stage() {
        let catalog = MemoryCatalog::new().with_stage(2, words(&["b"]), None);
        assert!(matches!(
            catalog.fetch_words(1),
            Err(SourceError::UnknownStage(1))
        ));
        assert_eq!(catalog.fetch_stage_config(2).unwrap(), None);
    }

    #[test]
    fn test_result_from_state() {
        let mut state = GameState::new(1);
        state.start(1);
        state.load_stage(words(&["a"]), StageConfig::sanitized(10.0, 2.0, None, None));
        for _ in 0..30 {
            state.movement_tick(50);
        }
        let result = GameResult::from_state("p1", &state);
        assert_eq!(result.player_id, "p1");
        assert_eq!(result.play_time_ms, 1500);
        assert_eq!(result.play_at, "00:01.5");
        assert_eq!(result.mileage(), 0.0);
    }

    #[test]
    fn test_memory_sink_keeps_results() {
        let mut sink = MemoryScoreSink::default();
        let result = GameResult {
            player_id: "p".into(),
            score: 2500,
            stage: 2,
            play_time_ms: 0,
            play_at: "00:00.0".into(),
        };
        sink.submit_result(&result).unwrap();
        assert_eq!(sink.results.len(), 1);
        assert_eq!(sink.results[0].mileage(), 2.5);
    }
}
