//! Effect state machine
//!
//! At most one effect is active. Matching a special word draws an effect
//! uniformly from [`EffectKind::ALL`] and activates it, replacing whatever was
//! active. The countdown runs once per second; at zero the effect's expiry
//! cleanup runs and the state returns to none.
//!
//! Board mutations are looked up through [`activation`] and [`expiry`], a
//! closed table over the enum rather than per-effect objects.

use typefall_types::{EffectKind, MASS_SPAWN_COUNT};

use crate::rng::SimpleRng;
use crate::spawn::SpawnFlavor;

/// One-time board mutation applied when an effect activates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Remove and score every word
    ClearBoard,
    /// Spawn words immediately
    Spawn { count: usize, flavor: SpawnFlavor },
    /// Spawn flavored words, once per activation
    SpawnOnce { flavor: SpawnFlavor },
    /// Life back to maximum
    RestoreLife,
    /// Landmine at the trigger word's position
    DropLandmine,
    /// Every word plus the trigger position become landmines
    Minefield,
    /// Mask every word
    HideWords,
    /// Behavior changes while active, nothing to apply up front
    Modifier,
}

/// Cleanup applied when an effect ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    RevealWords,
    Nothing,
}

/// Activation table
pub fn activation(kind: EffectKind) -> Activation {
    match kind {
        EffectKind::ClearBoard => Activation::ClearBoard,
        EffectKind::MassSpawn => Activation::Spawn {
            count: MASS_SPAWN_COUNT,
            flavor: SpawnFlavor::Plain,
        },
        EffectKind::ResetLife => Activation::RestoreLife,
        EffectKind::LandmineDrop => Activation::DropLandmine,
        EffectKind::LandmineField => Activation::Minefield,
        EffectKind::Math => Activation::SpawnOnce {
            flavor: SpawnFlavor::Math,
        },
        EffectKind::Bomb => Activation::SpawnOnce {
            flavor: SpawnFlavor::Bomb,
        },
        EffectKind::HideWords => Activation::HideWords,
        EffectKind::Freeze | EffectKind::SpeedUp | EffectKind::SlowDown => Activation::Modifier,
    }
}

/// Expiry table
pub fn expiry(kind: EffectKind) -> Expiry {
    match kind {
        EffectKind::HideWords => Expiry::RevealWords,
        _ => Expiry::Nothing,
    }
}

/// Draw an effect uniformly from the catalog
pub fn draw_effect(rng: &mut SimpleRng) -> EffectKind {
    let idx = rng.next_range(EffectKind::ALL.len() as u32) as usize;
    EffectKind::ALL[idx]
}

/// Outcome of one countdown step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Nothing active
    Idle,
    /// Still active with this many seconds left
    Running(u8),
    /// Reached zero; the caller runs the expiry cleanup
    Expired(EffectKind),
}

/// The active effect, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectState {
    kind: Option<EffectKind>,
    remaining_secs: u8,
    has_fired_spawn_once: bool,
}

impl EffectState {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<EffectKind> {
        self.kind
    }

    pub fn remaining_secs(&self) -> u8 {
        self.remaining_secs
    }

    pub fn has_fired_spawn_once(&self) -> bool {
        self.has_fired_spawn_once
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    pub fn is(&self, kind: EffectKind) -> bool {
        self.kind == Some(kind)
    }

    /// A timed effect is running (blocks special-word spawns)
    pub fn is_timed_active(&self) -> bool {
        self.kind.is_some_and(|k| k.is_timed())
    }

    /// Activate `kind` with its catalog duration.
    ///
    /// Returns the effect that was replaced; the caller is responsible for its
    /// expiry cleanup.
    pub fn activate(&mut self, kind: EffectKind) -> Option<EffectKind> {
        let previous = self.kind;
        *self = Self {
            kind: Some(kind),
            remaining_secs: kind.duration_secs(),
            has_fired_spawn_once: false,
        };
        previous
    }

    /// Consume the once-per-activation spawn.
    ///
    /// Returns true exactly once per activation of a math or bomb effect.
    pub fn take_spawn_once(&mut self) -> bool {
        let eligible = matches!(self.kind, Some(EffectKind::Math | EffectKind::Bomb));
        if !eligible || self.has_fired_spawn_once {
            return false;
        }
        self.has_fired_spawn_once = true;
        true
    }

    /// One-second countdown step
    pub fn countdown(&mut self) -> Countdown {
        let Some(kind) = self.kind else {
            return Countdown::Idle;
        };

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            *self = Self::none();
            Countdown::Expired(kind)
        } else {
            Countdown::Running(self.remaining_secs)
        }
    }

    /// End the active effect early, returning it
    pub fn cancel(&mut self) -> Option<EffectKind> {
        let previous = self.kind;
        *self = Self::none();
        previous
    }
}
