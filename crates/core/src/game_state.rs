//! Game state module - the session aggregate
//!
//! This module ties together the field, spawn policy, scoring, effect state
//! machine and stage bookkeeping. It owns every piece of mutable session state
//! and is only changed through its entry points, which the scheduler calls in
//! a serialized order:
//!
//! - [`GameState::movement_tick`]: move, collide, cull, bomb timers, life loss
//! - [`GameState::spawn_tick`]: one spawn request
//! - [`GameState::effect_tick`]: one-second effect countdown
//! - [`GameState::submit_input`]: a typed word from the player
//!
//! Missing stage data fails closed: with no [`StageConfig`] loaded nothing
//! moves and nothing spawns.

use std::mem;

use typefall_types::{
    EffectKind, GameStatus, StageConfig, DEFAULT_PLAY_AREA_HEIGHT_PX, OVERRIDE_SPAWN_COUNT,
};

use crate::effect::{self, Activation, Countdown, EffectState, Expiry};
use crate::field::{self, Landmine, Word};
use crate::rng::SimpleRng;
use crate::scoring::batch_score;
use crate::snapshot::{EffectSnapshot, GameSnapshot, WordSnapshot};
use crate::spawn::{self, SpawnRules};
use crate::stage::{ClearRule, StageController};

/// Events are dropped oldest-first beyond this many undrained entries.
const EVENT_BUFFER: usize = 256;

/// Something observers may want to react to (logging, sound, banners)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WordsMatched { count: u32, points: u64 },
    WordsDetonated { count: u32, points: u64 },
    WordsCleared { count: u32, points: u64 },
    WordsFallen { count: u32 },
    BombsExpired { count: u32 },
    LifeRestored,
    EffectActivated { kind: EffectKind },
    EffectReplaced { previous: EffectKind, next: EffectKind },
    EffectExpired { kind: EffectKind },
    EffectCancelled { kind: EffectKind },
    StageCleared { stage: u32 },
    StageStarted { stage: u32 },
    GameOver { stage: u32, score: u64 },
}

/// Result of a movement tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickOutcome {
    pub pixel_increment: f32,
    pub detonated: u32,
    pub points: u64,
    pub fallen: u32,
    pub expired: u32,
}

/// Result of submitting typed input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Words removed by this input
    pub matched: u32,
    pub points: u64,
    /// Effect activated by a special word in the batch
    pub triggered: Option<EffectKind>,
    /// The input hit a hidden word and ended hide-words early
    pub revealed: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    status: GameStatus,
    paused: bool,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    seed: u32,
    start_stage: u32,
    rng: SimpleRng,
    progress: StageController,
    score: u64,
    words: Vec<Word>,
    landmines: Vec<Landmine>,
    effect: EffectState,
    total_elapsed_ms: u64,
    stage_elapsed_ms: u64,
    word_id_counter: u32,
    landmine_id_counter: u32,
    word_list: Vec<String>,
    stage_config: Option<StageConfig>,
    /// Stage-1 fall duration, the pace slow-down falls back to.
    baseline_fall_secs: Option<f32>,
    play_area_height: f32,
    clear_rule: ClearRule,
    /// Bumped on every effect activation; the effect countdown restarts from it.
    effect_generation: u32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_play_area(seed, DEFAULT_PLAY_AREA_HEIGHT_PX)
    }

    /// Create a new game for a play area of the given pixel height
    pub fn with_play_area(seed: u32, play_area_height: f32) -> Self {
        let height = if play_area_height.is_finite() && play_area_height > 0.0 {
            play_area_height
        } else {
            DEFAULT_PLAY_AREA_HEIGHT_PX
        };

        Self {
            status: GameStatus::Ready,
            paused: false,
            episode_id: 0,
            seed,
            start_stage: 1,
            rng: SimpleRng::new(seed),
            progress: StageController::new(1),
            score: 0,
            words: Vec::new(),
            landmines: Vec::new(),
            effect: EffectState::none(),
            total_elapsed_ms: 0,
            stage_elapsed_ms: 0,
            word_id_counter: 0,
            landmine_id_counter: 0,
            word_list: Vec::new(),
            stage_config: None,
            baseline_fall_secs: None,
            play_area_height: height,
            clear_rule: ClearRule::default(),
            effect_generation: 0,
            events: Vec::new(),
        }
    }

    /// Start playing at `stage`. Does nothing once started.
    pub fn start(&mut self, stage: u32) {
        if self.status != GameStatus::Ready {
            return;
        }
        self.start_stage = stage.max(1);
        self.progress = StageController::new(self.start_stage);
        self.status = GameStatus::Playing;
        self.push_event(GameEvent::StageStarted {
            stage: self.progress.stage(),
        });
    }

    /// Install the word list and tuning for the current stage.
    ///
    /// `None` config keeps the stage idle (no movement, no spawn).
    pub fn load_stage(&mut self, word_list: Vec<String>, config: Option<StageConfig>) {
        self.word_list = word_list;
        self.stage_config = config;
        if let Some(cfg) = config {
            self.progress.set_clear_target(cfg.clear_target());
        }
    }

    pub fn set_baseline_fall_duration(&mut self, secs: Option<f32>) {
        self.baseline_fall_secs = secs.filter(|s| s.is_finite() && *s > 0.0);
    }

    pub fn set_clear_rule(&mut self, rule: ClearRule) {
        self.clear_rule = rule;
    }

    pub fn set_play_area_height(&mut self, height: f32) {
        if height.is_finite() && height > 0.0 {
            self.play_area_height = height;
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn stage(&self) -> u32 {
        self.progress.stage()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn life(&self) -> u8 {
        self.progress.life()
    }

    pub fn cleared_words(&self) -> u32 {
        self.progress.cleared_words()
    }

    pub fn clear_target(&self) -> u32 {
        self.progress.clear_target()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn landmines(&self) -> &[Landmine] {
        &self.landmines
    }

    pub fn effect(&self) -> &EffectState {
        &self.effect
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed_ms
    }

    pub fn stage_elapsed_ms(&self) -> u64 {
        self.stage_elapsed_ms
    }

    pub fn stage_config(&self) -> Option<&StageConfig> {
        self.stage_config.as_ref()
    }

    pub fn word_list(&self) -> &[String] {
        &self.word_list
    }

    pub fn play_area_height(&self) -> f32 {
        self.play_area_height
    }

    pub fn stage_clear_countdown_ms(&self) -> u32 {
        self.progress.countdown_ms()
    }

    /// Number of effect activations so far in this episode
    pub fn effect_generation(&self) -> u32 {
        self.effect_generation
    }

    /// Place a word directly, bypassing the spawn policy (scripted scenarios).
    ///
    /// The word receives the next id; returns that id.
    pub fn insert_word(&mut self, mut word: Word) -> u32 {
        word.id = self.next_word_id();
        let id = word.id;
        self.words.push(word);
        id
    }

    /// Place a landmine directly; returns its id.
    pub fn insert_landmine(&mut self, lane: u8, y: f32) -> u32 {
        self.add_landmine(lane, y)
    }

    /// Pixels words move on the next movement tick
    pub fn pixel_increment(&self) -> f32 {
        match self.stage_config {
            Some(cfg) => field::pixel_increment(
                self.play_area_height,
                cfg.fall_duration_secs,
                self.baseline_fall_secs,
                self.effect.kind(),
            ),
            None => 0.0,
        }
    }

    fn is_running(&self) -> bool {
        !self.paused && self.status == GameStatus::Playing
    }

    /// Movement tick: move, collide, cull, bomb timers, then life and stage checks.
    ///
    /// While the stage-clear display runs, this only advances its countdown.
    pub fn movement_tick(&mut self, elapsed_ms: u32) -> TickOutcome {
        if self.paused {
            return TickOutcome::default();
        }

        match self.status {
            GameStatus::Playing => {}
            GameStatus::StageClear => {
                if self.progress.tick_clear_countdown(elapsed_ms) {
                    self.advance_stage();
                }
                return TickOutcome::default();
            }
            GameStatus::Ready | GameStatus::GameOver => return TickOutcome::default(),
        }

        self.total_elapsed_ms += elapsed_ms as u64;
        self.stage_elapsed_ms += elapsed_ms as u64;

        let Some(config) = self.stage_config else {
            return TickOutcome::default();
        };

        let increment = self.pixel_increment();
        let step = field::step_field(
            &self.words,
            &self.landmines,
            increment,
            self.play_area_height,
            elapsed_ms,
        );

        let stage = self.progress.stage();
        let points = batch_score(&step.detonated, stage);
        let outcome = TickOutcome {
            pixel_increment: increment,
            detonated: step.detonated.len() as u32,
            points,
            fallen: step.fallen,
            expired: step.expired,
        };
        let life_lost = step.life_lost();

        self.words = step.words;
        self.landmines = step.landmines;
        self.score = self.score.saturating_add(points);

        if outcome.detonated > 0 {
            self.push_event(GameEvent::WordsDetonated {
                count: outcome.detonated,
                points,
            });
        }
        if outcome.fallen > 0 {
            self.push_event(GameEvent::WordsFallen {
                count: outcome.fallen,
            });
        }
        if outcome.expired > 0 {
            self.push_event(GameEvent::BombsExpired {
                count: outcome.expired,
            });
        }

        if life_lost > 0 && self.progress.lose_life(life_lost) {
            self.end_game();
            return outcome;
        }

        if self.clear_rule == ClearRule::Survival {
            let survived = config
                .clear_duration_secs
                .is_some_and(|secs| self.stage_elapsed_ms as f64 >= secs as f64 * 1000.0);
            if survived {
                self.enter_stage_clear();
            }
        }

        outcome
    }

    /// Scheduled spawn: one word, unless frozen or idle
    pub fn spawn_tick(&mut self) -> usize {
        self.request_spawn(1)
    }

    /// Spawn up to `count` words under the current effect's rules.
    ///
    /// Returns the number of words actually placed.
    pub fn request_spawn(&mut self, count: usize) -> usize {
        if !self.can_spawn() {
            return 0;
        }

        let hidden = self.effect.is(EffectKind::HideWords);
        let rules = SpawnRules::ordinary(!self.effect.is_timed_active()).hidden(hidden);
        self.spawn(count, rules)
    }

    fn can_spawn(&self) -> bool {
        self.is_running() && self.stage_config.is_some() && !self.effect.is(EffectKind::Freeze)
    }

    /// One-second effect countdown; runs the expiry cleanup at zero
    pub fn effect_tick(&mut self) -> Countdown {
        if !self.is_running() {
            return Countdown::Idle;
        }

        let countdown = self.effect.countdown();
        if let Countdown::Expired(kind) = countdown {
            self.run_expiry(kind);
            self.push_event(GameEvent::EffectExpired { kind });
        }
        countdown
    }

    /// Handle a typed word.
    ///
    /// Every word whose match target equals the trimmed input is removed and
    /// scored. Non-special removals count toward the stage quota; a special
    /// removal draws and activates a random effect instead.
    pub fn submit_input(&mut self, input: &str) -> MatchOutcome {
        if !self.is_running() {
            return MatchOutcome::default();
        }

        let typed = input.trim();
        if typed.is_empty() {
            return MatchOutcome::default();
        }

        let (removed, remaining): (Vec<Word>, Vec<Word>) =
            mem::take(&mut self.words).into_iter().partition(|w| w.matches(typed));
        self.words = remaining;

        if removed.is_empty() {
            return MatchOutcome::default();
        }

        let points = batch_score(&removed, self.progress.stage());
        self.score = self.score.saturating_add(points);

        let cleared = removed.iter().filter(|w| !w.is_special).count() as u32;
        self.progress.record_cleared(cleared);

        let mut outcome = MatchOutcome {
            matched: removed.len() as u32,
            points,
            ..MatchOutcome::default()
        };
        self.push_event(GameEvent::WordsMatched {
            count: outcome.matched,
            points,
        });

        if removed.iter().any(|w| w.is_hidden) && self.effect.is(EffectKind::HideWords) {
            self.effect.cancel();
            self.run_expiry(EffectKind::HideWords);
            self.push_event(GameEvent::EffectCancelled {
                kind: EffectKind::HideWords,
            });
            outcome.revealed = true;
        }

        if let Some(trigger) = removed.iter().find(|w| w.is_special) {
            let kind = effect::draw_effect(&mut self.rng);
            self.activate_effect(kind, Some((trigger.lane, trigger.y)));
            outcome.triggered = Some(kind);
        }

        if self.status == GameStatus::Playing && self.progress.quota_met() {
            self.enter_stage_clear();
        }

        outcome
    }

    /// Activate `kind`, replacing any active effect, and apply its one-time mutation.
    ///
    /// `trigger` is the lane and y of the special word that caused it.
    pub fn activate_effect(&mut self, kind: EffectKind, trigger: Option<(u8, f32)>) {
        self.effect_generation = self.effect_generation.wrapping_add(1);
        if let Some(previous) = self.effect.activate(kind) {
            self.run_expiry(previous);
            self.push_event(GameEvent::EffectReplaced {
                previous,
                next: kind,
            });
        }
        self.push_event(GameEvent::EffectActivated { kind });

        match effect::activation(kind) {
            Activation::ClearBoard => {
                let cleared = mem::take(&mut self.words);
                let points = batch_score(&cleared, self.progress.stage());
                self.score = self.score.saturating_add(points);
                self.push_event(GameEvent::WordsCleared {
                    count: cleared.len() as u32,
                    points,
                });
            }
            Activation::Spawn { count, flavor } => {
                if self.can_spawn() {
                    self.spawn(count, SpawnRules::flavored(flavor));
                }
            }
            Activation::SpawnOnce { flavor } => {
                if self.can_spawn() && self.effect.take_spawn_once() {
                    self.spawn(OVERRIDE_SPAWN_COUNT, SpawnRules::flavored(flavor));
                }
            }
            Activation::RestoreLife => {
                self.progress.restore_life();
                self.push_event(GameEvent::LifeRestored);
            }
            Activation::DropLandmine => {
                if let Some((lane, y)) = trigger {
                    self.add_landmine(lane, y);
                }
            }
            Activation::Minefield => {
                for word in mem::take(&mut self.words) {
                    self.add_landmine(word.lane, word.y);
                }
                if let Some((lane, y)) = trigger {
                    self.add_landmine(lane, y);
                }
            }
            Activation::HideWords => self.set_hidden(true),
            Activation::Modifier => {}
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Start over with the same seed and start stage; stage data must be reloaded.
    pub fn restart(&mut self) {
        let next_episode = self.episode_id.wrapping_add(1);
        let mut fresh = Self::with_play_area(self.seed, self.play_area_height);
        fresh.episode_id = next_episode;
        fresh.baseline_fall_secs = self.baseline_fall_secs;
        fresh.clear_rule = self.clear_rule;
        fresh.start(self.start_stage);
        *self = fresh;
    }

    /// Take all pending events.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            paused: self.paused,
            episode_id: self.episode_id,
            seed: self.seed,
            stage: self.progress.stage(),
            score: self.score,
            life: self.progress.life(),
            cleared_words: self.progress.cleared_words(),
            clear_target: self.progress.clear_target(),
            effect: self.effect.kind().map(|kind| EffectSnapshot {
                kind,
                remaining_secs: self.effect.remaining_secs(),
            }),
            words: self.words.iter().map(WordSnapshot::from).collect(),
            landmines: self.landmines.clone(),
            total_elapsed_ms: self.total_elapsed_ms,
            stage_elapsed_ms: self.stage_elapsed_ms,
            stage_clear_countdown_ms: self.progress.countdown_ms(),
        }
    }

    fn spawn(&mut self, count: usize, rules: SpawnRules) -> usize {
        let spawned = spawn::spawn_words(
            &self.words,
            &self.word_list,
            count,
            rules,
            &mut self.word_id_counter,
            &mut self.rng,
        );
        let n = spawned.len();
        self.words.extend(spawned);
        n
    }

    fn run_expiry(&mut self, kind: EffectKind) {
        match effect::expiry(kind) {
            Expiry::RevealWords => self.set_hidden(false),
            Expiry::Nothing => {}
        }
    }

    fn set_hidden(&mut self, hidden: bool) {
        for word in &mut self.words {
            word.is_hidden = hidden;
        }
    }

    fn next_word_id(&mut self) -> u32 {
        let id = self.word_id_counter;
        self.word_id_counter = self.word_id_counter.wrapping_add(1);
        id
    }

    fn add_landmine(&mut self, lane: u8, y: f32) -> u32 {
        let id = self.landmine_id_counter;
        self.landmine_id_counter = self.landmine_id_counter.wrapping_add(1);
        self.landmines.push(Landmine::new(id, lane, y));
        id
    }

    fn enter_stage_clear(&mut self) {
        self.status = GameStatus::StageClear;
        self.progress.begin_clear_countdown();
        self.push_event(GameEvent::StageCleared {
            stage: self.progress.stage(),
        });
    }

    /// Next stage: board, effect and stage data are cleared. Landmines do not carry over.
    fn advance_stage(&mut self) {
        self.progress.advance();
        self.words.clear();
        self.landmines.clear();
        self.effect = EffectState::none();
        self.stage_elapsed_ms = 0;
        self.word_list.clear();
        self.stage_config = None;
        self.status = GameStatus::Playing;
        self.push_event(GameEvent::StageStarted {
            stage: self.progress.stage(),
        });
    }

    fn end_game(&mut self) {
        self.status = GameStatus::GameOver;
        self.push_event(GameEvent::GameOver {
            stage: self.progress.stage(),
            score: self.score,
        });
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= EVENT_BUFFER {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
