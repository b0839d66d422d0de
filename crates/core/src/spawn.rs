//! Spawn policy - where and what new words appear
//!
//! A spawn request asks for `n` words. Lanes holding a word near the top
//! (`y < 100`) are excluded; the remaining lanes are shuffled and at most one
//! word is placed per lane. Requests larger than the free lane count are
//! truncated, never queued.

use arrayvec::ArrayVec;

use typefall_types::{
    BOMB_TIMER_MS, LANE_COUNT, MATH_ANSWER_MAX, MATH_ANSWER_MIN, SPAWN_EXCLUSION_PX,
    SPECIAL_WORD_CHANCE_PERCENT,
};

use crate::field::Word;
use crate::rng::SimpleRng;

const LANES: usize = LANE_COUNT as usize;

/// What kind of word a spawn produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpawnFlavor {
    /// Word from the stage list; may roll special
    Ordinary,
    /// Word from the stage list; never special
    Plain,
    /// Arithmetic expression; the answer is typed
    Math,
    /// Word from the stage list carrying a countdown
    Bomb,
}

/// Constraints for one spawn request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRules {
    pub flavor: SpawnFlavor,
    /// False while a timed effect is active
    pub allow_special: bool,
    /// Spawn words already masked
    pub hidden: bool,
}

impl SpawnRules {
    pub fn ordinary(allow_special: bool) -> Self {
        Self {
            flavor: SpawnFlavor::Ordinary,
            allow_special,
            hidden: false,
        }
    }

    pub fn flavored(flavor: SpawnFlavor) -> Self {
        Self {
            flavor,
            allow_special: false,
            hidden: false,
        }
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Lanes with no word above the spawn exclusion line, in ascending order
pub fn free_lanes(words: &[Word]) -> ArrayVec<u8, LANES> {
    let mut occupied = [false; LANES];
    for word in words.iter().filter(|w| w.y < SPAWN_EXCLUSION_PX) {
        if let Some(slot) = occupied.get_mut(word.lane as usize) {
            *slot = true;
        }
    }
    (0..LANE_COUNT)
        .filter(|&lane| !occupied[lane as usize])
        .collect()
}

pub fn has_special(words: &[Word]) -> bool {
    words.iter().any(|w| w.is_special)
}

/// Generate an addition or subtraction whose result lies in [1, 50].
///
/// Returns the rendered expression and its answer. Operands never exceed 50
/// and subtraction never goes negative.
pub fn math_problem(rng: &mut SimpleRng) -> (String, u32) {
    let answer = rng.next_between(MATH_ANSWER_MIN, MATH_ANSWER_MAX);
    if rng.chance_percent(50) {
        let a = rng.next_between(0, answer);
        (format!("{} + {}", a, answer - a), answer)
    } else {
        let b = rng.next_between(0, MATH_ANSWER_MAX - answer);
        (format!("{} - {}", answer + b, b), answer)
    }
}

/// Spawn up to `count` words at the top of free lanes.
///
/// `next_id` is advanced once per spawned word. An empty word list spawns
/// nothing. At most one special word exists on the board at a time, and only
/// [`SpawnFlavor::Ordinary`] spawns may roll one.
pub fn spawn_words(
    words: &[Word],
    word_list: &[String],
    count: usize,
    rules: SpawnRules,
    next_id: &mut u32,
    rng: &mut SimpleRng,
) -> Vec<Word> {
    if word_list.is_empty() || count == 0 {
        return Vec::new();
    }

    let mut lanes = free_lanes(words);
    rng.shuffle(&mut lanes);

    let mut special_available =
        rules.allow_special && rules.flavor == SpawnFlavor::Ordinary && !has_special(words);

    let spawn_count = count.min(lanes.len());
    let mut spawned = Vec::with_capacity(spawn_count);

    for &lane in lanes.iter().take(spawn_count) {
        let id = *next_id;
        *next_id = next_id.wrapping_add(1);

        let word = match rules.flavor {
            SpawnFlavor::Math => {
                let (expr, answer) = math_problem(rng);
                Word::new(id, expr, lane).with_math_answer(answer)
            }
            SpawnFlavor::Bomb => {
                let text = rng.pick(word_list).cloned().unwrap_or_default();
                Word::new(id, text, lane).with_timer(BOMB_TIMER_MS)
            }
            SpawnFlavor::Ordinary | SpawnFlavor::Plain => {
                let text = rng.pick(word_list).cloned().unwrap_or_default();
                let mut word = Word::new(id, text, lane);
                if special_available && rng.chance_percent(SPECIAL_WORD_CHANCE_PERCENT) {
                    word.is_special = true;
                    special_available = false;
                }
                word
            }
        };

        spawned.push(word.hidden(rules.hidden));
    }

    spawned
}
