//! File-backed collaborators
//!
//! Word list (`[{"text": "...", "min_level": 1, "max_level": 3}, ...]`) and
//! stage settings (`[{"stage_level": 1, "fall_duration_seconds": 10, ...}]`)
//! are JSON arrays. Stage numbers may arrive as JSON numbers or numeric
//! strings; anything unusable is dropped here so the simulation only ever sees
//! a validated [`StageConfig`] or nothing.
//!
//! Results are appended to a JSON-lines file, one record per game.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use typefall_engine::types::StageConfig;
use typefall_engine::{
    GameResult, ScoreSink, SourceError, SourceResult, StageConfigSource, WordSource,
};

/// A number or a string holding one
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordRecord {
    pub text: String,
    pub min_level: u32,
    pub max_level: u32,
}

impl WordRecord {
    pub fn new(text: impl Into<String>, min_level: u32, max_level: u32) -> Self {
        Self {
            text: text.into(),
            min_level,
            max_level,
        }
    }

    pub fn covers(&self, stage: u32) -> bool {
        self.min_level <= stage && stage <= self.max_level
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageRecord {
    pub stage_level: Numeric,
    pub fall_duration_seconds: Option<Numeric>,
    pub spawn_interval_seconds: Option<Numeric>,
    #[serde(default)]
    pub clear_duration_seconds: Option<Numeric>,
    #[serde(default)]
    pub clear_word_count: Option<Numeric>,
}

impl StageRecord {
    /// Stage number, if it is a positive whole number
    pub fn stage(&self) -> Option<u32> {
        self.stage_level
            .value()
            .filter(|v| *v >= 1.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
    }

    /// Validated tuning; `None` when fall or spawn timing is unusable
    pub fn config(&self) -> Option<StageConfig> {
        let secs = |field: &Option<Numeric>| field.as_ref().and_then(Numeric::value).map(|v| v as f32);
        let count = self
            .clear_word_count
            .as_ref()
            .and_then(Numeric::value)
            .filter(|v| *v >= 1.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32);

        StageConfig::sanitized(
            secs(&self.fall_duration_seconds)?,
            secs(&self.spawn_interval_seconds)?,
            secs(&self.clear_duration_seconds),
            count,
        )
    }
}

/// Word list and stage settings held in memory.
///
/// A stage past the last configured one reuses the last configuration.
#[derive(Debug, Clone, Default)]
pub struct FileCatalog {
    words: Vec<WordRecord>,
    stages: BTreeMap<u32, Option<StageConfig>>,
}

impl FileCatalog {
    pub fn from_records(words: Vec<WordRecord>, stages: Vec<StageRecord>) -> Self {
        let mut by_stage = BTreeMap::new();
        for record in stages {
            match record.stage() {
                Some(stage) => {
                    let config = record.config();
                    if config.is_none() {
                        warn!(stage, "stage settings unusable; stage will stay idle");
                    }
                    by_stage.insert(stage, config);
                }
                None => warn!(record = ?record.stage_level, "skipping stage record with bad stage_level"),
            }
        }

        let words: Vec<WordRecord> = words
            .into_iter()
            .filter(|w| !w.text.trim().is_empty() && w.min_level <= w.max_level)
            .collect();

        Self {
            words,
            stages: by_stage,
        }
    }

    /// Parse both documents from JSON text
    pub fn from_json(words_json: &str, stages_json: &str) -> SourceResult<Self> {
        let words: Vec<WordRecord> = serde_json::from_str(words_json).map_err(decode_error)?;
        let stages: Vec<StageRecord> = serde_json::from_str(stages_json).map_err(decode_error)?;
        Ok(Self::from_records(words, stages))
    }

    pub fn load(words_path: &Path, stages_path: &Path) -> SourceResult<Self> {
        let words_json = fs::read_to_string(words_path)?;
        let stages_json = fs::read_to_string(stages_path)?;
        let catalog = Self::from_json(&words_json, &stages_json)?;
        info!(
            words = catalog.words.len(),
            stages = catalog.stages.len(),
            path = %words_path.display(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl WordSource for FileCatalog {
    fn fetch_words(&self, stage: u32) -> SourceResult<Vec<String>> {
        let words: Vec<String> = self
            .words
            .iter()
            .filter(|w| w.covers(stage))
            .map(|w| w.text.clone())
            .collect();
        debug!(stage, count = words.len(), "words fetched");
        Ok(words)
    }
}

impl StageConfigSource for FileCatalog {
    fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>> {
        self.stages
            .range(..=stage)
            .next_back()
            .map(|(_, config)| *config)
            .ok_or(SourceError::UnknownStage(stage))
    }
}

/// On-disk form of a [`GameResult`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub player_id: String,
    pub score: u64,
    pub stage: u32,
    pub play_time_ms: u64,
    pub play_at: String,
    pub mileage: f64,
}

impl From<&GameResult> for ResultRecord {
    fn from(value: &GameResult) -> Self {
        Self {
            player_id: value.player_id.clone(),
            score: value.score,
            stage: value.stage,
            play_time_ms: value.play_time_ms,
            play_at: value.play_at.clone(),
            mileage: value.mileage(),
        }
    }
}

/// Appends one JSON line per result
#[derive(Debug, Clone)]
pub struct JsonlScoreSink {
    path: PathBuf,
}

impl JsonlScoreSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file
    pub fn read_all(&self) -> SourceResult<Vec<ResultRecord>> {
        let text = fs::read_to_string(&self.path)?;
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(decode_error))
            .collect()
    }
}

impl ScoreSink for JsonlScoreSink {
    fn submit_result(&mut self, result: &GameResult) -> SourceResult<()> {
        let mut line = serde_json::to_vec(&ResultRecord::from(result)).map_err(decode_error)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(&line)?;
        Ok(())
    }
}

/// Sink used when no results file is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogScoreSink;

impl ScoreSink for LogScoreSink {
    fn submit_result(&mut self, result: &GameResult) -> SourceResult<()> {
        info!(
            player = %result.player_id,
            score = result.score,
            stage = result.stage,
            play_at = %result.play_at,
            "final result"
        );
        Ok(())
    }
}

fn decode_error(err: serde_json::Error) -> SourceError {
    SourceError::Decode(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = r#"[
        {"text": "사과", "min_level": 1, "max_level": 2},
        {"text": "banana", "min_level": 2, "max_level": 5},
        {"text": "  ", "min_level": 1, "max_level": 9},
        {"text": "backwards", "min_level": 4, "max_level": 1}
    ]"#;

    const STAGES: &str = r#"[
        {"stage_level": 1, "fall_duration_seconds": 10, "spawn_interval_seconds": "2.5",
         "clear_duration_seconds": 60, "clear_word_count": "15"},
        {"stage_level": "2", "fall_duration_seconds": "abc", "spawn_interval_seconds": 2},
        {"stage_level": 3, "fall_duration_seconds": 8, "spawn_interval_seconds": 1.5,
         "clear_word_count": null},
        {"stage_level": "x", "fall_duration_seconds": 8, "spawn_interval_seconds": 1.5}
    ]"#;

    #[test]
    fn test_numeric_accepts_strings() {
        assert_eq!(Numeric::Number(2.0).value(), Some(2.0));
        assert_eq!(Numeric::Text(" 1.5 ".into()).value(), Some(1.5));
        assert_eq!(Numeric::Text("NaN".into()).value(), None);
        assert_eq!(Numeric::Text("fast".into()).value(), None);
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog = FileCatalog::from_json(WORDS, STAGES).unwrap();
        assert_eq!(catalog.word_count(), 2);
        assert_eq!(catalog.stage_count(), 3);

        assert_eq!(catalog.fetch_words(1).unwrap(), vec!["사과".to_string()]);
        assert_eq!(catalog.fetch_words(2).unwrap().len(), 2);
        assert!(catalog.fetch_words(9).unwrap().is_empty());

        let stage1 = catalog.fetch_stage_config(1).unwrap().unwrap();
        assert_eq!(stage1.spawn_interval_secs, 2.5);
        assert_eq!(stage1.clear_target(), 15);
        assert_eq!(stage1.clear_duration_secs, Some(60.0));

        // Non-numeric fall duration: record kept, config unusable.
        assert_eq!(catalog.fetch_stage_config(2).unwrap(), None);

        let stage3 = catalog.fetch_stage_config(3).unwrap().unwrap();
        assert_eq!(stage3.clear_target(), 20);
        // Past the last record the last configuration applies.
        assert_eq!(catalog.fetch_stage_config(7).unwrap(), Some(stage3));
    }

    #[test]
    fn test_unknown_stage_below_first_record() {
        let catalog = FileCatalog::from_json("[]", r#"[{"stage_level": 2, "fall_duration_seconds": 5, "spawn_interval_seconds": 1}]"#).unwrap();
        assert!(matches!(
            catalog.fetch_stage_config(1),
            Err(SourceError::UnknownStage(1))
        ));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        assert!(matches!(
            FileCatalog::from_json("{", "[]"),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.json");
        let stages = dir.path().join("stages.json");
        fs::write(&words, WORDS).unwrap();
        fs::write(&stages, STAGES).unwrap();

        let catalog = FileCatalog::load(&words, &stages).unwrap();
        assert_eq!(catalog.stage_count(), 3);

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            FileCatalog::load(&missing, &stages),
            Err(SourceError::Io(_))
        ));
    }

    #[test]
    fn test_jsonl_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonlScoreSink::new(dir.path().join("results.jsonl"));

        for score in [1250, 40] {
            let result = GameResult {
                player_id: "p1".into(),
                score,
                stage: 2,
                play_time_ms: 83_450,
                play_at: "01:23.4".into(),
            };
            sink.submit_result(&result).unwrap();
        }

        let records = sink.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 1250);
        assert_eq!(records[0].mileage, 1.2);
        assert_eq!(records[1].play_at, "01:23.4");
    }
}
