//! Snapshot module - owned, read-only copies of the game for observers
//!
//! Renderers and the autoplay bot read these instead of borrowing the live
//! [`GameState`](crate::game_state::GameState). Hidden word text is masked
//! at capture time.

use typefall_types::{EffectKind, GameStatus};

use crate::field::{Landmine, Word};

/// A word as presentation sees it; hidden text is already masked
#[derive(Debug, Clone, PartialEq)]
pub struct WordSnapshot {
    pub id: u32,
    pub text: String,
    pub lane: u8,
    pub y: f32,
    pub is_special: bool,
    pub is_hidden: bool,
    pub is_math: bool,
    /// Remaining bomb time and the starting value
    pub timer_ms: Option<u32>,
    pub max_timer_ms: Option<u32>,
}

impl From<&Word> for WordSnapshot {
    fn from(value: &Word) -> Self {
        Self {
            id: value.id,
            text: value.display_text(),
            lane: value.lane,
            y: value.y,
            is_special: value.is_special,
            is_hidden: value.is_hidden,
            is_math: value.math_answer.is_some(),
            timer_ms: value.timer_ms,
            max_timer_ms: value.max_timer_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectSnapshot {
    pub kind: EffectKind,
    pub remaining_secs: u8,
}

/// Read-only view of a session, published after every tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub paused: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub stage: u32,
    pub score: u64,
    pub life: u8,
    pub cleared_words: u32,
    pub clear_target: u32,
    pub effect: Option<EffectSnapshot>,
    pub words: Vec<WordSnapshot>,
    pub landmines: Vec<Landmine>,
    pub total_elapsed_ms: u64,
    pub stage_elapsed_ms: u64,
    pub stage_clear_countdown_ms: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Visible (unmasked) texts, in board order
    pub fn visible_texts(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .filter(|w| !w.is_hidden)
            .map(|w| w.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_snapshot_from_word() {
        let word = Word::new(4, "12 + 3", 2).at(40.0).with_math_answer(15);
        let snap = WordSnapshot::from(&word);
        assert_eq!(snap.id, 4);
        assert_eq!(snap.text, "12 + 3");
        assert!(snap.is_math);
        assert_eq!(snap.timer_ms, None);
    }

    #[test]
    fn test_default_snapshot_not_playable() {
        let snap = GameSnapshot::default();
        assert_eq!(snap.status, GameStatus::Ready);
        assert!(!snap.playable());
        assert!(!snap.game_over());
        assert_eq!(snap.visible_texts().count(), 0);
    }
}
