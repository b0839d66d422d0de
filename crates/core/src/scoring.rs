//! Scoring module - points for eliminated words
//!
//! - Ordinary words: `keystrokes(text) * stage * 10`
//! - Math words: `answer * 100`, independent of stage and rendered text
//!
//! Every elimination path scores except a word falling off the board.

use typefall_types::{POINTS_PER_KEYSTROKE, POINTS_PER_MATH_UNIT};

use crate::field::Word;
use crate::keystroke::keystroke_cost;

/// Points for typing `text` on `stage`
pub fn text_score(text: &str, stage: u32) -> u64 {
    keystroke_cost(text) as u64 * stage as u64 * POINTS_PER_KEYSTROKE
}

/// Points for a math word with the given answer
pub fn math_score(answer: u32) -> u64 {
    answer as u64 * POINTS_PER_MATH_UNIT
}

/// Points for eliminating `word` on `stage`
///
/// # Examples
///
/// ```
/// use typefall_core::field::Word;
/// use typefall_core::scoring::word_score;
///
/// assert_eq!(word_score(&Word::new(0, "test", 0), 1), 40);
/// assert_eq!(word_score(&Word::new(1, "12 + 30", 0).with_math_answer(42), 3), 4200);
/// ```
pub fn word_score(word: &Word, stage: u32) -> u64 {
    match word.math_answer {
        Some(answer) => math_score(answer),
        None => text_score(&word.text, stage),
    }
}

/// Total points for a batch of eliminated words
pub fn batch_score<'a>(words: impl IntoIterator<Item = &'a Word>, stage: u32) -> u64 {
    words
        .into_iter()
        .map(|w| word_score(w, stage))
        .fold(0u64, u64::saturating_add)
}

/// Mileage earned for a final score: score / 1000, floored to one decimal
pub fn mileage(score: u64) -> f64 {
    (score / 100) as f64 / 10.0
}

/// Format a play time as `MM:SS.d`
///
/// # Examples
///
/// ```
/// use typefall_core::scoring::format_play_time;
///
/// assert_eq!(format_play_time(0), "00:00.0");
/// assert_eq!(format_play_time(83_450), "01:23.4");
/// ```
pub fn format_play_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    let tenths = (ms % 1000) / 100;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}
