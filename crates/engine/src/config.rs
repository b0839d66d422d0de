use typefall_core::ClearRule;
use typefall_types::DEFAULT_PLAY_AREA_HEIGHT_PX;

/// Session tuning
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub player_id: String,
    pub seed: u32,
    pub start_stage: u32,
    pub play_area_height: f32,
    pub clear_rule: ClearRule,
}

impl EngineConfig {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_start_stage(mut self, stage: u32) -> Self {
        self.start_stage = stage.max(1);
        self
    }

    pub fn with_play_area_height(mut self, height: f32) -> Self {
        self.play_area_height = height;
        self
    }

    pub fn with_clear_rule(mut self, rule: ClearRule) -> Self {
        self.clear_rule = rule;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_id: "guest".to_string(),
            seed: 1,
            start_stage: 1,
            play_area_height: DEFAULT_PLAY_AREA_HEIGHT_PX,
            clear_rule: ClearRule::Quota,
        }
    }
}
