//! Tick scheduler - drives the simulation from elapsed time
//!
//! Two independent periodic timers feed the game:
//!
//! - the movement timer (every [`TICK_MS`]): one movement tick, then the
//!   spawn timer is advanced by the same amount
//! - the effect timer (every [`EFFECT_TICK_MS`]): one effect countdown step
//!   (restarted whenever a new effect activates)
//!
//! The spawn timer runs at the current stage's spawn interval and fires on the
//! first movement tick of a stage. Nothing accrues while the game is paused,
//! so resuming never replays paused time.
//!
//! An async driver calls [`Scheduler::on_movement_tick`] and
//! [`Scheduler::on_effect_tick`] from its own intervals; synchronous callers
//! (tests, benchmarks, headless replays) feed elapsed time to
//! [`Scheduler::advance`].

use typefall_core::{Countdown, GameState};
use typefall_types::{EffectKind, GameStatus, EFFECT_TICK_MS, TICK_MS};

/// Accumulator that fires every `period_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u32,
    elapsed_ms: u32,
    primed: bool,
}

impl IntervalTimer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
            primed: false,
        }
    }

    /// Fires on the first advance, then every period
    pub fn immediate(period_ms: u32) -> Self {
        Self {
            primed: true,
            ..Self::new(period_ms)
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Returns how many times the timer fired
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        let mut fires = 0;
        if self.primed {
            self.primed = false;
            fires += 1;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        fires += self.elapsed_ms / self.period_ms;
        self.elapsed_ms %= self.period_ms;
        fires
    }
}

/// What happened during one scheduler call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub movement_ticks: u32,
    pub effect_ticks: u32,
    pub spawned: u32,
    pub points: u64,
    pub detonated: u32,
    pub fallen: u32,
    pub expired_bombs: u32,
    /// Last effect that ran out during this call
    pub expired_effect: Option<EffectKind>,
}

impl TickReport {
    fn merge(&mut self, other: TickReport) {
        self.movement_ticks += other.movement_ticks;
        self.effect_ticks += other.effect_ticks;
        self.spawned += other.spawned;
        self.points = self.points.saturating_add(other.points);
        self.detonated += other.detonated;
        self.fallen += other.fallen;
        self.expired_bombs += other.expired_bombs;
        if other.expired_effect.is_some() {
            self.expired_effect = other.expired_effect;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    movement: IntervalTimer,
    spawn: IntervalTimer,
    effect: IntervalTimer,
    running: bool,
    /// (episode, stage) whose spawn interval is installed
    spawn_key: Option<(u32, u32)>,
    /// Last effect activation the effect timer was aligned to
    effect_generation: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            movement: IntervalTimer::new(TICK_MS),
            spawn: IntervalTimer::immediate(TICK_MS),
            effect: IntervalTimer::new(EFFECT_TICK_MS),
            running: false,
            spawn_key: None,
            effect_generation: 0,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop all timers and drop partial progress
    pub fn stop(&mut self) {
        self.running = false;
        self.movement.reset();
        self.effect.reset();
        self.spawn_key = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self, state: &mut GameState) {
        state.pause();
    }

    pub fn resume(&mut self, state: &mut GameState) {
        state.resume();
    }

    pub fn spawn_interval_ms(&self) -> Option<u32> {
        self.spawn_key.map(|_| self.spawn.period_ms())
    }

    /// Feed elapsed wall time; fires both timers as many times as it covers
    pub fn advance(&mut self, state: &mut GameState, elapsed_ms: u32) -> TickReport {
        self.advance_with(state, elapsed_ms, |_| {})
    }

    /// Like [`advance`](Self::advance), calling `before_step` ahead of every
    /// movement tick so a caller can install stage data mid-call.
    pub fn advance_with<F>(
        &mut self,
        state: &mut GameState,
        elapsed_ms: u32,
        mut before_step: F,
    ) -> TickReport
    where
        F: FnMut(&mut GameState),
    {
        let mut report = TickReport::default();
        if !self.running || state.paused() {
            return report;
        }

        let steps = self.movement.advance(elapsed_ms);
        for _ in 0..steps {
            before_step(state);
            report.merge(self.on_movement_tick(state));
            self.sync_effect_timer(state);
            for _ in 0..self.effect.advance(TICK_MS) {
                report.merge(self.on_effect_tick(state));
            }
        }
        report
    }

    /// One movement tick, then the spawn timer
    pub fn on_movement_tick(&mut self, state: &mut GameState) -> TickReport {
        let mut report = TickReport::default();
        if !self.running || state.paused() {
            return report;
        }

        let outcome = state.movement_tick(TICK_MS);
        report.movement_ticks = 1;
        report.points = outcome.points;
        report.detonated = outcome.detonated;
        report.fallen = outcome.fallen;
        report.expired_bombs = outcome.expired;

        self.sync_spawn_timer(state);
        if self.spawn_key.is_some() {
            for _ in 0..self.spawn.advance(TICK_MS) {
                report.spawned += state.spawn_tick() as u32;
            }
        }
        report
    }

    /// One effect countdown step
    pub fn on_effect_tick(&mut self, state: &mut GameState) -> TickReport {
        let mut report = TickReport::default();
        if !self.running || state.paused() {
            return report;
        }

        report.effect_ticks = 1;
        if let Countdown::Expired(kind) = state.effect_tick() {
            report.expired_effect = Some(kind);
        }
        report
    }

    /// Restart the effect countdown period when a new effect has activated,
    /// so every effect gets a full second before its first decrement.
    pub fn sync_effect_timer(&mut self, state: &GameState) {
        let generation = state.effect_generation();
        if generation != self.effect_generation {
            self.effect_generation = generation;
            self.effect.reset();
        }
    }

    /// Install the spawn interval once the current stage's config is loaded
    fn sync_spawn_timer(&mut self, state: &GameState) {
        if state.status() != GameStatus::Playing {
            self.spawn_key = None;
            return;
        }

        let key = (state.episode_id(), state.stage());
        match state.stage_config() {
            Some(config) if self.spawn_key != Some(key) => {
                self.spawn = IntervalTimer::immediate(config.spawn_interval_ms());
                self.spawn_key = Some(key);
            }
            Some(_) => {}
            None => self.spawn_key = None,
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
