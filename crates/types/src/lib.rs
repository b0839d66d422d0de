//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core simulation, scheduler, async runtime, renderers).
//!
//! # Play Area
//!
//! - **Lanes**: 12 discrete columns (indexed 0-11)
//! - **Vertical axis**: pixels from the top of the play area
//! - **Word height**: 30px assumed bounding height for collisions
//! - **Landmine height**: 20px assumed bounding height for collisions
//! - **Spawn exclusion**: a lane holding a word with `y < 100` is not eligible for spawning
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 50 | Movement tick interval |
//! | `EFFECT_TICK_MS` | 1000 | Effect countdown interval |
//! | `BOMB_TIMER_MS` | 10000 | Countdown carried by bomb words |
//! | `STAGE_CLEAR_DISPLAY_MS` | 5000 | Stage-clear display before the next stage |
//!
//! # Examples
//!
//! ```
//! use typefall_types::{DurationClass, EffectKind, LANE_COUNT, MAX_LIFE};
//!
//! let kind = EffectKind::from_str("freeze").unwrap();
//! assert_eq!(kind, EffectKind::Freeze);
//! assert_eq!(kind.duration_class(), DurationClass::Timed);
//! assert_eq!(kind.duration_secs(), 5);
//!
//! assert_eq!(LANE_COUNT, 12);
//! assert_eq!(MAX_LIFE, 12);
//! ```

/// Number of lanes (12 columns)
pub const LANE_COUNT: u8 = 12;

/// Assumed word bounding height in pixels
pub const WORD_HEIGHT_PX: f32 = 30.0;

/// Assumed landmine bounding height in pixels
pub const LANDMINE_HEIGHT_PX: f32 = 20.0;

/// Words above this line block their lane for spawning
pub const SPAWN_EXCLUSION_PX: f32 = 100.0;

/// Default play area height when the host does not report one
pub const DEFAULT_PLAY_AREA_HEIGHT_PX: f32 = 600.0;

/// Movement tick interval in milliseconds
pub const TICK_MS: u32 = 50;

/// Effect countdown interval in milliseconds
pub const EFFECT_TICK_MS: u32 = 1000;

/// Life units at the start of each stage attempt
pub const MAX_LIFE: u8 = 12;

/// Countdown carried by bomb words
pub const BOMB_TIMER_MS: u32 = 10_000;

/// Stage-clear display time before the next stage starts
pub const STAGE_CLEAR_DISPLAY_MS: u32 = 5_000;

/// Stage-clear quota when the stage config does not provide one
pub const DEFAULT_CLEAR_WORD_COUNT: u32 = 20;

/// Duration of instant effects in seconds
pub const INSTANT_EFFECT_SECS: u8 = 3;

/// Duration of timed effects in seconds
pub const TIMED_EFFECT_SECS: u8 = 5;

/// Chance (percent) that an eligible spawned word is special
pub const SPECIAL_WORD_CHANCE_PERCENT: u32 = 15;

/// Words spawned by the mass-spawn effect
pub const MASS_SPAWN_COUNT: usize = 5;

/// Words spawned once per activation by the math and bomb effects
pub const OVERRIDE_SPAWN_COUNT: usize = 3;

/// Fall time divisor applied by speed-up
pub const SPEED_UP_FACTOR: f32 = 1.5;

/// Inclusive bounds for math-word answers
pub const MATH_ANSWER_MIN: u32 = 1;
pub const MATH_ANSWER_MAX: u32 = 50;

/// Points per keystroke per stage
pub const POINTS_PER_KEYSTROKE: u64 = 10;

/// Points per unit of a math-word answer
pub const POINTS_PER_MATH_UNIT: u64 = 100;

/// Returns true if `lane` is a valid lane index
#[inline]
pub fn is_valid_lane(lane: u8) -> bool {
    lane < LANE_COUNT
}

/// Duration class of an effect
///
/// - **Instant**: the board mutation applies once at activation; the effect
///   stays listed as active for its (short) duration.
/// - **Timed**: the effect modifies behavior for its whole duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationClass {
    Instant,
    Timed,
}

/// The closed catalog of effects ("viruses") a special word can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Remove and score every word on the board
    ClearBoard,
    /// Spawn five ordinary words immediately
    MassSpawn,
    /// Restore life to the maximum
    ResetLife,
    /// Drop a landmine where the trigger word was
    LandmineDrop,
    /// Turn every word (and the trigger position) into landmines
    LandmineField,
    /// Spawn arithmetic words once; their answer is typed instead of the text
    Math,
    /// Spawn countdown words once; expiry costs a life
    Bomb,
    /// Words stop falling and no words spawn
    Freeze,
    /// Fall time divided by 1.5
    SpeedUp,
    /// Fall time pinned to the stage-1 baseline
    SlowDown,
    /// Word text is masked until expiry or until a hidden word is typed
    HideWords,
}

impl EffectKind {
    /// Every effect, in catalog order
    pub const ALL: [EffectKind; 11] = [
        EffectKind::ClearBoard,
        EffectKind::MassSpawn,
        EffectKind::ResetLife,
        EffectKind::LandmineDrop,
        EffectKind::LandmineField,
        EffectKind::Math,
        EffectKind::Bomb,
        EffectKind::Freeze,
        EffectKind::SpeedUp,
        EffectKind::SlowDown,
        EffectKind::HideWords,
    ];

    /// Parse effect kind from its kebab-case name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use typefall_types::EffectKind;
    ///
    /// assert_eq!(EffectKind::from_str("clear-board"), Some(EffectKind::ClearBoard));
    /// assert_eq!(EffectKind::from_str("HIDE-WORDS"), Some(EffectKind::HideWords));
    /// assert_eq!(EffectKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clear-board" => Some(EffectKind::ClearBoard),
            "mass-spawn" => Some(EffectKind::MassSpawn),
            "reset-life" => Some(EffectKind::ResetLife),
            "landmine-drop" => Some(EffectKind::LandmineDrop),
            "landmine-field" => Some(EffectKind::LandmineField),
            "math" => Some(EffectKind::Math),
            "bomb" => Some(EffectKind::Bomb),
            "freeze" => Some(EffectKind::Freeze),
            "speed-up" => Some(EffectKind::SpeedUp),
            "slow-down" => Some(EffectKind::SlowDown),
            "hide-words" => Some(EffectKind::HideWords),
            _ => None,
        }
    }

    /// Convert to kebab-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::ClearBoard => "clear-board",
            EffectKind::MassSpawn => "mass-spawn",
            EffectKind::ResetLife => "reset-life",
            EffectKind::LandmineDrop => "landmine-drop",
            EffectKind::LandmineField => "landmine-field",
            EffectKind::Math => "math",
            EffectKind::Bomb => "bomb",
            EffectKind::Freeze => "freeze",
            EffectKind::SpeedUp => "speed-up",
            EffectKind::SlowDown => "slow-down",
            EffectKind::HideWords => "hide-words",
        }
    }

    /// Human-readable name for banners
    pub fn display_name(&self) -> &'static str {
        match self {
            EffectKind::ClearBoard => "Annihilator",
            EffectKind::MassSpawn => "Gang",
            EffectKind::ResetLife => "Reconstruction",
            EffectKind::LandmineDrop => "Landmine",
            EffectKind::LandmineField => "Minefield",
            EffectKind::Math => "Math Class",
            EffectKind::Bomb => "Time Bomb",
            EffectKind::Freeze => "Stun",
            EffectKind::SpeedUp => "Swift",
            EffectKind::SlowDown => "Sloth",
            EffectKind::HideWords => "Hide and Seek",
        }
    }

    pub fn duration_class(&self) -> DurationClass {
        match self {
            EffectKind::Freeze
            | EffectKind::SpeedUp
            | EffectKind::SlowDown
            | EffectKind::HideWords => DurationClass::Timed,
            EffectKind::ClearBoard
            | EffectKind::MassSpawn
            | EffectKind::ResetLife
            | EffectKind::LandmineDrop
            | EffectKind::LandmineField
            | EffectKind::Math
            | EffectKind::Bomb => DurationClass::Instant,
        }
    }

    /// Seconds the effect stays active
    pub fn duration_secs(&self) -> u8 {
        match self.duration_class() {
            DurationClass::Instant => INSTANT_EFFECT_SECS,
            DurationClass::Timed => TIMED_EFFECT_SECS,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.duration_class() == DurationClass::Timed
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    /// Created, not yet started
    #[default]
    Ready,
    Playing,
    /// Stage quota met; waiting out the display countdown
    StageClear,
    /// Terminal
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ready => "ready",
            GameStatus::Playing => "playing",
            GameStatus::StageClear => "stage_clear",
            GameStatus::GameOver => "game_over",
        }
    }
}

/// Per-stage tuning, already validated
///
/// Construct through [`StageConfig::sanitized`] when values come from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Seconds a word takes to cross the play area
    pub fall_duration_secs: f32,
    /// Seconds between spawn ticks
    pub spawn_interval_secs: f32,
    /// Seconds of play after which the survival rule clears the stage
    pub clear_duration_secs: Option<f32>,
    /// Stage-clear quota
    pub clear_word_count: Option<u32>,
}

impl StageConfig {
    /// Validate raw values.
    ///
    /// Returns `None` when the movement or spawn timing is unusable, which the
    /// simulation treats as "no movement, no spawn". Optional fields that are
    /// non-positive or non-finite are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use typefall_types::StageConfig;
    ///
    /// assert!(StageConfig::sanitized(8.0, 2.0, Some(60.0), Some(20)).is_some());
    /// assert!(StageConfig::sanitized(f32::NAN, 2.0, None, None).is_none());
    /// assert!(StageConfig::sanitized(8.0, 0.0, None, None).is_none());
    ///
    /// let cfg = StageConfig::sanitized(8.0, 2.0, Some(-1.0), Some(0)).unwrap();
    /// assert_eq!(cfg.clear_duration_secs, None);
    /// assert_eq!(cfg.clear_word_count, None);
    /// ```
    pub fn sanitized(
        fall_duration_secs: f32,
        spawn_interval_secs: f32,
        clear_duration_secs: Option<f32>,
        clear_word_count: Option<u32>,
    ) -> Option<Self> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(fall_duration_secs) || !positive(spawn_interval_secs) {
            return None;
        }
        Some(Self {
            fall_duration_secs,
            spawn_interval_secs,
            clear_duration_secs: clear_duration_secs.filter(|v| positive(*v)),
            clear_word_count: clear_word_count.filter(|&c| c > 0),
        })
    }

    /// Stage-clear quota, falling back to [`DEFAULT_CLEAR_WORD_COUNT`]
    pub fn clear_target(&self) -> u32 {
        self.clear_word_count.unwrap_or(DEFAULT_CLEAR_WORD_COUNT)
    }

    /// Spawn interval in whole milliseconds (at least one movement tick)
    pub fn spawn_interval_ms(&self) -> u32 {
        ((self.spawn_interval_secs * 1000.0).round() as u32).max(TICK_MS)
    }
}
