//! Built-in catalog used when no word or stage files are configured

use crate::store::{FileCatalog, Numeric, StageRecord, WordRecord};

const STAGE_COUNT: u32 = 10;

/// Words that stay available past the last stage
const ENDLESS: u32 = u32::MAX;

/// (text, min_level, max_level)
const WORDS: &[(&str, u32, u32)] = &[
    ("사과", 1, 3),
    ("바다", 1, 3),
    ("나무", 1, 3),
    ("하늘", 1, 4),
    ("구름", 1, 4),
    ("별빛", 2, 5),
    ("keyboard", 1, ENDLESS),
    ("rust", 1, ENDLESS),
    ("lane", 1, 6),
    ("spawn", 1, 6),
    ("컴퓨터", 2, 6),
    ("자동차", 2, 6),
    ("도서관", 3, 7),
    ("무지개", 3, 8),
    ("횡단보도", 4, ENDLESS),
    ("민들레꽃", 4, ENDLESS),
    ("landmine", 3, ENDLESS),
    ("semicolon", 4, ENDLESS),
    ("괜찮아요", 5, ENDLESS),
    ("읽었습니다", 6, ENDLESS),
    ("밝혀졌다", 6, ENDLESS),
    ("compiler", 5, ENDLESS),
    ("borrow checker", 7, ENDLESS),
    ("닭갈비볶음밥", 8, ENDLESS),
];

/// Catalog with ten stages that fall and spawn faster as they go
pub fn builtin_catalog() -> FileCatalog {
    let words = WORDS
        .iter()
        .map(|&(text, min, max)| WordRecord::new(text, min, max))
        .collect();

    let stages = (1..=STAGE_COUNT)
        .map(|stage| {
            let s = stage as f64;
            StageRecord {
                stage_level: Numeric::Number(s),
                fall_duration_seconds: Some(Numeric::Number((12.0 - 0.8 * s).max(4.0))),
                spawn_interval_seconds: Some(Numeric::Number((2.0 - 0.12 * s).max(0.6))),
                clear_duration_seconds: Some(Numeric::Number(60.0)),
                clear_word_count: Some(Numeric::Number((15 + 5 * stage) as f64)),
            }
        })
        .collect();

    FileCatalog::from_records(words, stages)
}
