//! Runtime configuration from environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TYPEFALL_WORDS_PATH` | built-in catalog | JSON word list |
//! | `TYPEFALL_STAGES_PATH` | built-in catalog | JSON stage settings |
//! | `TYPEFALL_RESULTS_PATH` | log only | JSON-lines file results are appended to |
//! | `TYPEFALL_PLAYER_ID` | `guest` | id attached to submitted results |
//! | `TYPEFALL_SEED` | clock-derived | simulation seed |
//! | `TYPEFALL_START_STAGE` | 1 | first stage |
//! | `TYPEFALL_PLAY_AREA_PX` | 600 | play-area height in pixels |
//! | `TYPEFALL_CLEAR_RULE` | `quota` | `quota` or `survival` |
//! | `TYPEFALL_TIME_LIMIT_SECS` | 120 | autoplay cap |
//! | `TYPEFALL_BOT_MISS_PERCENT` | 10 | autoplay typo rate |
//!
//! Unparsable values fall back to their defaults.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use typefall_engine::core::ClearRule;
use typefall_engine::EngineConfig;
use typefall_engine::types::DEFAULT_PLAY_AREA_HEIGHT_PX;

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub words_path: Option<PathBuf>,
    pub stages_path: Option<PathBuf>,
    pub results_path: Option<PathBuf>,
    pub player_id: String,
    pub seed: u32,
    pub start_stage: u32,
    pub play_area_height: f32,
    pub clear_rule: ClearRule,
    pub time_limit_secs: u64,
    pub bot_miss_percent: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            words_path: None,
            stages_path: None,
            results_path: None,
            player_id: "guest".to_string(),
            seed: 1,
            start_stage: 1,
            play_area_height: DEFAULT_PLAY_AREA_HEIGHT_PX,
            clear_rule: ClearRule::Quota,
            time_limit_secs: 120,
            bot_miss_percent: 10,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = text("TYPEFALL_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);

        let play_area_height = text("TYPEFALL_PLAY_AREA_PX")
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(defaults.play_area_height);

        let clear_rule = match text("TYPEFALL_CLEAR_RULE").as_deref() {
            Some("survival") => ClearRule::Survival,
            _ => ClearRule::Quota,
        };

        Self {
            words_path: text("TYPEFALL_WORDS_PATH").map(PathBuf::from),
            stages_path: text("TYPEFALL_STAGES_PATH").map(PathBuf::from),
            results_path: text("TYPEFALL_RESULTS_PATH").map(PathBuf::from),
            player_id: text("TYPEFALL_PLAYER_ID").unwrap_or(defaults.player_id),
            seed,
            start_stage: text("TYPEFALL_START_STAGE")
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|s| *s > 0)
                .unwrap_or(defaults.start_stage),
            play_area_height,
            clear_rule,
            time_limit_secs: text("TYPEFALL_TIME_LIMIT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.time_limit_secs),
            bot_miss_percent: text("TYPEFALL_BOT_MISS_PERCENT")
                .and_then(|s| s.parse::<u32>().ok())
                .map(|p| p.min(100))
                .unwrap_or(defaults.bot_miss_percent),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.player_id.clone())
            .with_seed(self.seed)
            .with_start_stage(self.start_stage)
            .with_play_area_height(self.play_area_height)
            .with_clear_rule(self.clear_rule)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TYPEFALL_WORDS_PATH", "/tmp/words.json"),
            ("TYPEFALL_PLAYER_ID", " alice "),
            ("TYPEFALL_SEED", "42"),
            ("TYPEFALL_START_STAGE", "3"),
            ("TYPEFALL_PLAY_AREA_PX", "480"),
            ("TYPEFALL_CLEAR_RULE", "survival"),
            ("TYPEFALL_TIME_LIMIT_SECS", "30"),
            ("TYPEFALL_BOT_MISS_PERCENT", "250"),
        ]));

        assert_eq!(config.words_path, Some(PathBuf::from("/tmp/words.json")));
        assert_eq!(config.stages_path, None);
        assert_eq!(config.player_id, "alice");
        assert_eq!(config.seed, 42);
        assert_eq!(config.start_stage, 3);
        assert_eq!(config.play_area_height, 480.0);
        assert_eq!(config.clear_rule, ClearRule::Survival);
        assert_eq!(config.time_limit_secs, 30);
        assert_eq!(config.bot_miss_percent, 100);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("TYPEFALL_SEED", "7"),
            ("TYPEFALL_START_STAGE", "0"),
            ("TYPEFALL_PLAY_AREA_PX", "-5"),
            ("TYPEFALL_TIME_LIMIT_SECS", "soon"),
            ("TYPEFALL_RESULTS_PATH", "   "),
        ]));

        assert_eq!(config.start_stage, 1);
        assert_eq!(config.play_area_height, 600.0);
        assert_eq!(config.time_limit_secs, 120);
        assert_eq!(config.results_path, None);
        assert_eq!(config.clear_rule, ClearRule::Quota);
    }

    #[test]
    fn test_engine_config() {
        let config = RuntimeConfig::from_lookup(lookup(&[("TYPEFALL_SEED", "9")]));
        let engine = config.engine_config();
        assert_eq!(engine.seed, 9);
        assert_eq!(engine.player_id, "guest");
    }

    #[test]
    fn test_from_env_does_not_panic() {
        let _config = RuntimeConfig::from_env();
    }
}
