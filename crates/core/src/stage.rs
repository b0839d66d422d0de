//! Stage and life bookkeeping
//!
//! Tracks the current stage, life units, the stage-clear quota and the
//! stage-clear display countdown. Status transitions live in
//! [`GameState`](crate::game_state::GameState); this module only answers
//! "is the pool empty" and "is the quota met".

use typefall_types::{DEFAULT_CLEAR_WORD_COUNT, MAX_LIFE, STAGE_CLEAR_DISPLAY_MS};

/// When a stage counts as cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearRule {
    /// Typed-word quota only
    #[default]
    Quota,
    /// Quota, or surviving the stage's clear duration
    Survival,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageController {
    stage: u32,
    life: u8,
    cleared_words: u32,
    clear_target: u32,
    countdown_ms: u32,
}

impl StageController {
    pub fn new(stage: u32) -> Self {
        Self {
            stage: stage.max(1),
            life: MAX_LIFE,
            cleared_words: 0,
            clear_target: DEFAULT_CLEAR_WORD_COUNT,
            countdown_ms: 0,
        }
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn life(&self) -> u8 {
        self.life
    }

    pub fn cleared_words(&self) -> u32 {
        self.cleared_words
    }

    pub fn clear_target(&self) -> u32 {
        self.clear_target
    }

    pub fn countdown_ms(&self) -> u32 {
        self.countdown_ms
    }

    pub fn set_clear_target(&mut self, target: u32) {
        self.clear_target = target.max(1);
    }

    /// Remove `count` life units. Returns true when the pool is empty.
    pub fn lose_life(&mut self, count: u32) -> bool {
        let loss = count.min(u8::MAX as u32) as u8;
        self.life = self.life.saturating_sub(loss);
        self.is_depleted()
    }

    pub fn is_depleted(&self) -> bool {
        self.life == 0
    }

    pub fn restore_life(&mut self) {
        self.life = MAX_LIFE;
    }

    pub fn record_cleared(&mut self, count: u32) {
        self.cleared_words = self.cleared_words.saturating_add(count);
    }

    pub fn quota_met(&self) -> bool {
        self.cleared_words >= self.clear_target
    }

    pub fn begin_clear_countdown(&mut self) {
        self.countdown_ms = STAGE_CLEAR_DISPLAY_MS;
    }

    /// Returns true once the stage-clear display has finished
    pub fn tick_clear_countdown(&mut self, elapsed_ms: u32) -> bool {
        self.countdown_ms = self.countdown_ms.saturating_sub(elapsed_ms);
        self.countdown_ms == 0
    }

    /// Move to the next stage. Life carries over.
    pub fn advance(&mut self) {
        self.stage = self.stage.saturating_add(1);
        self.cleared_words = 0;
        self.clear_target = DEFAULT_CLEAR_WORD_COUNT;
        self.countdown_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stage_controller() {
        let ctl = StageController::new(1);
        assert_eq!(ctl.stage(), 1);
        assert_eq!(ctl.life(), 12);
        assert_eq!(ctl.cleared_words(), 0);
        assert_eq!(ctl.clear_target(), 20);

        assert_eq!(StageController::new(0).stage(), 1);
    }

    #[test]
    fn test_lose_life() {
        let mut ctl = StageController::new(1);
        assert!(!ctl.lose_life(1));
        assert_eq!(ctl.life(), 11);
        assert!(ctl.lose_life(20));
        assert_eq!(ctl.life(), 0);
        assert!(ctl.is_depleted());

        ctl.restore_life();
        assert_eq!(ctl.life(), 12);
    }

    #[test]
    fn test_quota() {
        let mut ctl = StageController::new(2);
        ctl.set_clear_target(3);
        ctl.record_cleared(2);
        assert!(!ctl.quota_met());
        ctl.record_cleared(1);
        assert!(ctl.quota_met());
    }

    #[test]
    fn test_clear_countdown_and_advance() {
        let mut ctl = StageController::new(1);
        ctl.set_clear_target(1);
        ctl.record_cleared(1);
        ctl.lose_life(4);
        ctl.begin_clear_countdown();

        assert!(!ctl.tick_clear_countdown(4_950));
        assert!(ctl.tick_clear_countdown(50));

        ctl.advance();
        assert_eq!(ctl.stage(), 2);
        assert_eq!(ctl.cleared_words(), 0);
        assert_eq!(ctl.clear_target(), 20);
        assert_eq!(ctl.life(), 8);
    }
}
