//! Keystroke cost model
//!
//! Converts text into the number of key presses needed to type it on a
//! two-set Hangul / QWERTY layout. Scoring is built on this count, so it is
//! table-driven rather than length-based:
//!
//! - A precomposed Hangul syllable is split into lead, vowel and optional tail
//!   jamo. Each simple jamo costs 1; compound jamo (double consonants,
//!   diphthongs, consonant clusters) cost 2.
//! - Uppercase Latin letters and shift-row symbols cost 2.
//! - Everything else (lowercase, digits, basic punctuation, spaces) costs 1.

/// First precomposed Hangul syllable (가)
const HANGUL_BASE: u32 = 0xAC00;
/// Last precomposed Hangul syllable (힣)
const HANGUL_LAST: u32 = 0xD7A3;

const JUNG_COUNT: u32 = 21;
const JONG_COUNT: u32 = 28;

/// Lead consonants: ㄱ ㄲ ㄴ ㄷ ㄸ ㄹ ㅁ ㅂ ㅃ ㅅ ㅆ ㅇ ㅈ ㅉ ㅊ ㅋ ㅌ ㅍ ㅎ
const LEAD_COST: [u8; 19] = [1, 2, 1, 1, 2, 1, 1, 1, 2, 1, 2, 1, 1, 2, 1, 1, 1, 1, 1];

/// Vowels: ㅏ ㅐ ㅑ ㅒ ㅓ ㅔ ㅕ ㅖ ㅗ ㅘ ㅙ ㅚ ㅛ ㅜ ㅝ ㅞ ㅟ ㅠ ㅡ ㅢ ㅣ
const VOWEL_COST: [u8; 21] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 1, 1, 2, 2, 2, 1, 1, 2, 1,
];

/// Tail consonants, index 0 is "no tail":
/// - ㄱ ㄲ ㄳ ㄴ ㄵ ㄶ ㄷ ㄹ ㄺ ㄻ ㄼ ㄽ ㄾ ㄿ ㅀ ㅁ ㅂ ㅄ ㅅ ㅆ ㅇ ㅈ ㅊ ㅋ ㅌ ㅍ ㅎ
const TAIL_COST: [u8; 28] = [
    0, 1, 2, 2, 1, 2, 2, 1, 1, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 1,
];

/// Symbols that need the shift key on a US layout
const SHIFT_SYMBOLS: &[char] = &[
    '?', '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '_', '+', '{', '}', '|', ':', '"',
    '<', '>', '~',
];

/// Lead/vowel/tail indices of a precomposed Hangul syllable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syllable {
    pub lead: u8,
    pub vowel: u8,
    /// 0 when the syllable has no tail
    pub tail: u8,
}

impl Syllable {
    /// Decompose `c` if it is a precomposed Hangul syllable
    pub fn decompose(c: char) -> Option<Self> {
        let code = c as u32;
        if !(HANGUL_BASE..=HANGUL_LAST).contains(&code) {
            return None;
        }
        let offset = code - HANGUL_BASE;
        Some(Self {
            lead: (offset / (JUNG_COUNT * JONG_COUNT)) as u8,
            vowel: ((offset % (JUNG_COUNT * JONG_COUNT)) / JONG_COUNT) as u8,
            tail: (offset % JONG_COUNT) as u8,
        })
    }

    pub fn cost(&self) -> u32 {
        LEAD_COST[self.lead as usize] as u32
            + VOWEL_COST[self.vowel as usize] as u32
            + TAIL_COST[self.tail as usize] as u32
    }
}

/// Keystroke cost of a single character
pub fn char_cost(c: char) -> u32 {
    if let Some(syllable) = Syllable::decompose(c) {
        return syllable.cost();
    }
    if c.is_ascii_uppercase() || SHIFT_SYMBOLS.contains(&c) {
        2
    } else {
        1
    }
}

/// Keystroke cost of a string
///
/// # Examples
///
/// ```
/// use typefall_core::keystroke::keystroke_cost;
///
/// assert_eq!(keystroke_cost("test"), 4);
/// assert_eq!(keystroke_cost("Hi!"), 5);
/// assert_eq!(keystroke_cost("각"), 3); // ㄱ + ㅏ + ㄱ
/// assert_eq!(keystroke_cost("왕"), 4); // ㅇ + ㅘ + ㅇ
/// ```
pub fn keystroke_cost(text: &str) -> u32 {
    text.chars().map(char_cost).sum()
}
