//! Field module - falling words, landmines, movement and collision
//!
//! The play area is 12 lanes wide; vertical positions are pixels from the top.
//! Every function here takes the current entities by reference and returns the
//! next state, so a tick is a pure transformation that is easy to test without
//! timers.
//!
//! Per movement tick, in order:
//! 1. every word moves down by the pixel increment
//! 2. words overlapping a landmine in the same lane detonate together with it
//! 3. words below the play area are culled (ordinary words cost a life)
//! 4. bomb timers count down; an expired bomb is removed and costs a life

use typefall_types::{
    EffectKind, LANDMINE_HEIGHT_PX, SPEED_UP_FACTOR, TICK_MS, WORD_HEIGHT_PX,
};

/// A falling word
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Unique, monotonic within a session
    pub id: u32,
    pub text: String,
    /// Lane index (0-11)
    pub lane: u8,
    /// Top edge, pixels from the top of the play area
    pub y: f32,
    /// Matching this word triggers an effect
    pub is_special: bool,
    /// Text is masked while hide-words is active
    pub is_hidden: bool,
    /// When set, the typed input is compared against this instead of `text`
    pub math_answer: Option<u32>,
    /// Bomb countdown in milliseconds
    pub timer_ms: Option<u32>,
    pub max_timer_ms: Option<u32>,
}

impl Word {
    /// Create an ordinary word at the top of `lane`
    pub fn new(id: u32, text: impl Into<String>, lane: u8) -> Self {
        Self {
            id,
            text: text.into(),
            lane,
            y: 0.0,
            is_special: false,
            is_hidden: false,
            math_answer: None,
            timer_ms: None,
            max_timer_ms: None,
        }
    }

    pub fn at(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    /// Attach an arithmetic answer; `text` should be the rendered expression
    pub fn with_math_answer(mut self, answer: u32) -> Self {
        self.math_answer = Some(answer);
        self
    }

    /// Attach a bomb countdown
    pub fn with_timer(mut self, timer_ms: u32) -> Self {
        self.timer_ms = Some(timer_ms);
        self.max_timer_ms = Some(timer_ms);
        self
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + WORD_HEIGHT_PX
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer_ms.is_some_and(|t| t > 0)
    }

    /// Check whether typed input eliminates this word
    ///
    /// A math word only matches its numeric answer.
    pub fn matches(&self, input: &str) -> bool {
        match self.math_answer {
            Some(answer) => input.parse::<u32>().is_ok_and(|n| n == answer),
            None => self.text == input,
        }
    }

    /// Text as it should be shown (masked while hidden)
    pub fn display_text(&self) -> String {
        if self.is_hidden {
            "?".repeat(self.text.chars().count())
        } else {
            self.text.clone()
        }
    }
}

/// A stationary landmine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmine {
    pub id: u32,
    pub lane: u8,
    pub y: f32,
}

impl Landmine {
    pub fn new(id: u32, lane: u8, y: f32) -> Self {
        Self { id, lane, y }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + LANDMINE_HEIGHT_PX
    }

    /// Same lane and overlapping vertical spans (edges touching count)
    pub fn overlaps(&self, word: &Word) -> bool {
        word.lane == self.lane && word.bottom() >= self.top() && word.top() <= self.bottom()
    }
}

/// Result of moving the field by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldStep {
    /// Words still on the board
    pub words: Vec<Word>,
    /// Landmines still on the board
    pub landmines: Vec<Landmine>,
    /// Words destroyed by a landmine (scored by the caller)
    pub detonated: Vec<Word>,
    /// Ordinary words that left the play area
    pub fallen: u32,
    /// Special or bomb words that left the play area without penalty
    pub exempt_exits: u32,
    /// Bomb words whose countdown ran out
    pub expired: u32,
}

impl FieldStep {
    /// Life units lost this tick
    pub fn life_lost(&self) -> u32 {
        self.fallen + self.expired
    }
}

/// Move every word, resolve landmine collisions and cull words below the play area.
///
/// Collisions are tested against the landmines as they were before the tick: a
/// word overlapping several landmines detonates all of them.
pub fn move_words(
    words: &[Word],
    landmines: &[Landmine],
    pixel_increment: f32,
    play_area_height: f32,
) -> FieldStep {
    let dy = pixel_increment.max(0.0);
    let mut step = FieldStep::default();
    let mut spent_mines: Vec<u32> = Vec::new();

    for word in words {
        let moved = Word {
            y: word.y + dy,
            ..word.clone()
        };

        let mut hit = false;
        for mine in landmines.iter().filter(|m| m.overlaps(&moved)) {
            hit = true;
            if !spent_mines.contains(&mine.id) {
                spent_mines.push(mine.id);
            }
        }

        if hit {
            step.detonated.push(moved);
        } else if moved.y > play_area_height {
            if moved.is_special || moved.has_active_timer() {
                step.exempt_exits += 1;
            } else {
                step.fallen += 1;
            }
        } else {
            step.words.push(moved);
        }
    }

    step.landmines = landmines
        .iter()
        .filter(|m| !spent_mines.contains(&m.id))
        .copied()
        .collect();

    step
}

/// Count bomb timers down by `elapsed_ms`.
///
/// Returns the surviving words and the number of bombs that expired.
pub fn tick_timers(words: Vec<Word>, elapsed_ms: u32) -> (Vec<Word>, u32) {
    let mut expired = 0;
    let survivors = words
        .into_iter()
        .filter_map(|mut word| match word.timer_ms {
            Some(t) => {
                let left = t.saturating_sub(elapsed_ms);
                if left == 0 {
                    expired += 1;
                    None
                } else {
                    word.timer_ms = Some(left);
                    Some(word)
                }
            }
            None => Some(word),
        })
        .collect();
    (survivors, expired)
}

/// Full field update for one movement tick: move, collide, cull, then bomb timers.
pub fn step_field(
    words: &[Word],
    landmines: &[Landmine],
    pixel_increment: f32,
    play_area_height: f32,
    elapsed_ms: u32,
) -> FieldStep {
    let mut step = move_words(words, landmines, pixel_increment, play_area_height);
    let (survivors, expired) = tick_timers(std::mem::take(&mut step.words), elapsed_ms);
    step.words = survivors;
    step.expired = expired;
    step
}

/// Pixels a word moves per movement tick.
///
/// A word crosses the play area in `fall_duration_secs`; speed-up divides that
/// time by 1.5, slow-down pins it to the stage-1 baseline (when known) and
/// freeze stops movement. Unusable durations yield 0.
pub fn pixel_increment(
    play_area_height: f32,
    fall_duration_secs: f32,
    baseline_fall_secs: Option<f32>,
    effect: Option<EffectKind>,
) -> f32 {
    let ticks_per_sec = 1000.0 / TICK_MS as f32;

    let fall_secs = match effect {
        Some(EffectKind::Freeze) => return 0.0,
        Some(EffectKind::SpeedUp) => fall_duration_secs / SPEED_UP_FACTOR,
        Some(EffectKind::SlowDown) => baseline_fall_secs.unwrap_or(fall_duration_secs),
        _ => fall_duration_secs,
    };

    let ticks_to_fall = fall_secs * ticks_per_sec;
    if !ticks_to_fall.is_finite() || ticks_to_fall <= 0.0 || !play_area_height.is_finite() {
        return 0.0;
    }
    (play_area_height / ticks_to_fall).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_words_by_increment() {
        let words = vec![Word::new(1, "test", 0).at(10.0)];
        let step = move_words(&words, &[], 5.0, 500.0);

        assert_eq!(step.words[0].y, 15.0);
        assert_eq!(step.fallen, 0);
    }

    #[test]
    fn test_negative_increment_is_clamped() {
        let words = vec![Word::new(1, "test", 0).at(10.0)];
        let step = move_words(&words, &[], -5.0, 500.0);
        assert_eq!(step.words[0].y, 10.0);
    }

    #[test]
    fn test_landmine_collision_removes_both() {
        let words = vec![Word::new(1, "test", 0).at(100.0)];
        // Word moves to 110, bottom 140; landmine spans 120..140.
        let landmines = vec![Landmine::new(1, 0, 120.0)];

        let step = move_words(&words, &landmines, 10.0, 500.0);

        assert_eq!(step.detonated.len(), 1);
        assert_eq!(step.detonated[0].id, 1);
        assert!(step.words.is_empty());
        assert!(step.landmines.is_empty());
        assert_eq!(step.fallen, 0);
    }

    #[test]
    fn test_landmine_other_lane_untouched() {
        let words = vec![Word::new(1, "test", 0).at(100.0)];
        let landmines = vec![Landmine::new(1, 1, 120.0)];

        let step = move_words(&words, &landmines, 10.0, 500.0);
        assert!(step.detonated.is_empty());
        assert_eq!(step.words.len(), 1);
        assert_eq!(step.landmines.len(), 1);
    }

    #[test]
    fn test_touching_edges_collide() {
        // Word bottom (0 + 30) touches landmine top at 30.
        let words = vec![Word::new(1, "a", 3)];
        let landmines = vec![Landmine::new(7, 3, 30.0)];
        let step = move_words(&words, &landmines, 0.0, 500.0);
        assert_eq!(step.detonated.len(), 1);
    }

    #[test]
    fn test_word_overlapping_two_mines_detonates_both() {
        let words = vec![Word::new(1, "a", 2).at(100.0)];
        let landmines = vec![Landmine::new(1, 2, 105.0), Landmine::new(2, 2, 120.0)];
        let step = move_words(&words, &landmines, 0.0, 500.0);
        assert_eq!(step.detonated.len(), 1);
        assert!(step.landmines.is_empty());
    }

    #[test]
    fn test_fallen_word_counts() {
        let words = vec![Word::new(1, "test", 0).at(490.0)];
        let step = move_words(&words, &[], 20.0, 500.0);

        assert_eq!(step.fallen, 1);
        assert!(step.words.is_empty());
    }

    #[test]
    fn test_word_exactly_at_bottom_survives() {
        let words = vec![Word::new(1, "test", 0).at(490.0)];
        let step = move_words(&words, &[], 10.0, 500.0);
        assert_eq!(step.fallen, 0);
        assert_eq!(step.words.len(), 1);
    }

    #[test]
    fn test_special_and_bomb_exit_without_penalty() {
        let words = vec![
            Word::new(1, "a", 0).at(490.0).special(),
            Word::new(2, "b", 1).at(490.0).with_timer(5000),
        ];
        let step = move_words(&words, &[], 20.0, 500.0);
        assert_eq!(step.fallen, 0);
        assert_eq!(step.exempt_exits, 2);
        assert!(step.words.is_empty());
    }

    #[test]
    fn test_tick_timers_expire() {
        let words = vec![
            Word::new(1, "a", 0).with_timer(100),
            Word::new(2, "b", 1).with_timer(40),
            Word::new(3, "c", 2),
        ];
        let (left, expired) = tick_timers(words, 50);
        assert_eq!(expired, 1);
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].timer_ms, Some(50));
        assert_eq!(left[0].max_timer_ms, Some(100));
        assert_eq!(left[1].timer_ms, None);
    }

    #[test]
    fn test_step_field_life_lost() {
        let words = vec![
            Word::new(1, "a", 0).at(495.0),
            Word::new(2, "b", 1).with_timer(50),
        ];
        let step = step_field(&words, &[], 10.0, 500.0, 50);
        assert_eq!(step.fallen, 1);
        assert_eq!(step.expired, 1);
        assert_eq!(step.life_lost(), 2);
        assert!(step.words.is_empty());
    }

    #[test]
    fn test_matches_text_and_math() {
        let word = Word::new(1, "apple", 0);
        assert!(word.matches("apple"));
        assert!(!word.matches("Apple"));

        let math = Word::new(2, "3 + 4", 0).with_math_answer(7);
        assert!(math.matches("7"));
        assert!(!math.matches("3 + 4"));
        assert!(!math.matches("seven"));
    }

    #[test]
    fn test_display_text_masks_hidden() {
        let word = Word::new(1, "사과", 0).hidden(true);
        assert_eq!(word.display_text(), "??");
        assert_eq!(word.hidden(false).display_text(), "사과");
    }

    #[test]
    fn test_pixel_increment_modifiers() {
        // 10s fall at 50ms ticks = 200 ticks over 600px = 3px per tick.
        assert_eq!(pixel_increment(600.0, 10.0, None, None), 3.0);
        assert_eq!(pixel_increment(600.0, 10.0, None, Some(EffectKind::Freeze)), 0.0);
        assert!((pixel_increment(600.0, 10.0, None, Some(EffectKind::SpeedUp)) - 4.5).abs() < 1e-4);
        assert_eq!(
            pixel_increment(600.0, 5.0, Some(10.0), Some(EffectKind::SlowDown)),
            3.0
        );
        // Without a baseline slow-down leaves the stage speed alone.
        assert_eq!(pixel_increment(600.0, 10.0, None, Some(EffectKind::SlowDown)), 3.0);
        // Instant effects do not change speed.
        assert_eq!(pixel_increment(600.0, 10.0, None, Some(EffectKind::Math)), 3.0);
    }

    #[test]
    fn test_pixel_increment_fails_closed() {
        assert_eq!(pixel_increment(600.0, 0.0, None, None), 0.0);
        assert_eq!(pixel_increment(600.0, f32::NAN, None, None), 0.0);
        assert_eq!(pixel_increment(600.0, -3.0, None, None), 0.0);
    }
}
