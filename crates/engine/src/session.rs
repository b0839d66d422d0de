//! Session - a game wired to its collaborators
//!
//! The session owns the [`GameState`] and the [`Scheduler`], fetches stage
//! data when a stage begins, and hands the final result to the score sink
//! exactly once. Collaborator failures never stop the game: a missing word
//! list or config leaves the stage idle and is logged.

use tracing::{debug, error, info, warn};

use typefall_core::{GameEvent, GameSnapshot, GameState, MatchOutcome};
use typefall_types::GameStatus;

use crate::config::EngineConfig;
use crate::scheduler::{Scheduler, TickReport};
use crate::sources::{GameResult, ScoreSink, StageConfigSource, WordSource};

pub struct Session<W, C, S> {
    config: EngineConfig,
    state: GameState,
    scheduler: Scheduler,
    words: W,
    configs: C,
    sink: S,
    /// (episode, stage) whose data has been requested
    loaded: Option<(u32, u32)>,
    result: Option<GameResult>,
}

impl<W, C, S> Session<W, C, S>
where
    W: WordSource,
    C: StageConfigSource,
    S: ScoreSink,
{
    pub fn new(config: EngineConfig, words: W, configs: C, sink: S) -> Self {
        let mut state = GameState::with_play_area(config.seed, config.play_area_height);
        state.set_clear_rule(config.clear_rule);

        Self {
            config,
            state,
            scheduler: Scheduler::new(),
            words,
            configs,
            sink,
            loaded: None,
            result: None,
        }
    }

    /// Fetch the slow-down baseline, start the game and load the first stage
    pub fn start(&mut self) {
        match self.configs.fetch_stage_config(1) {
            Ok(config) => self
                .state
                .set_baseline_fall_duration(config.map(|c| c.fall_duration_secs)),
            Err(err) => warn!(error = %err, "stage 1 baseline unavailable"),
        }

        self.state.start(self.config.start_stage);
        self.scheduler.start();
        info!(
            player = %self.config.player_id,
            seed = self.config.seed,
            stage = self.state.stage(),
            "session started"
        );
        self.after_step();
    }

    /// Feed elapsed wall time to both timers
    pub fn advance(&mut self, elapsed_ms: u32) -> TickReport {
        let Self {
            state,
            scheduler,
            words,
            configs,
            loaded,
            ..
        } = self;
        let report = scheduler.advance_with(state, elapsed_ms, |state| {
            load_stage(state, &*words, &*configs, loaded)
        });
        self.after_step();
        report
    }

    /// One movement tick (async driver entry point)
    pub fn movement_tick(&mut self) -> TickReport {
        load_stage(&mut self.state, &self.words, &self.configs, &mut self.loaded);
        let report = self.scheduler.on_movement_tick(&mut self.state);
        self.after_step();
        report
    }

    /// One effect countdown step (async driver entry point)
    pub fn effect_tick(&mut self) -> TickReport {
        let report = self.scheduler.on_effect_tick(&mut self.state);
        self.after_step();
        report
    }

    pub fn submit_input(&mut self, input: &str) -> MatchOutcome {
        let outcome = self.state.submit_input(input);
        if outcome.matched > 0 {
            debug!(
                input,
                matched = outcome.matched,
                points = outcome.points,
                "input matched"
            );
        }
        self.after_step();
        outcome
    }

    pub fn pause(&mut self) {
        if !self.state.paused() {
            self.scheduler.pause(&mut self.state);
            info!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.paused() {
            self.scheduler.resume(&mut self.state);
            info!("resumed");
        }
    }

    /// New episode with the same seed; the next game submits its own result
    pub fn restart(&mut self) {
        self.state.restart();
        self.scheduler.stop();
        self.scheduler.start();
        self.loaded = None;
        self.result = None;
        info!(episode = self.state.episode_id(), "session restarted");
        self.after_step();
    }

    /// Submit the current result if the game has not already done so.
    ///
    /// Used when a run is abandoned before game over (time limit, shutdown).
    pub fn finish(&mut self) -> Option<&GameResult> {
        self.scheduler.stop();
        self.submit_once();
        self.result.as_ref()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.game_over()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn after_step(&mut self) {
        load_stage(&mut self.state, &self.words, &self.configs, &mut self.loaded);

        for event in self.state.drain_events() {
            log_event(&event);
        }

        if self.state.game_over() {
            self.scheduler.stop();
            self.submit_once();
        }
    }

    fn submit_once(&mut self) {
        if self.result.is_some() {
            return;
        }

        let result = GameResult::from_state(self.config.player_id.clone(), &self.state);
        match self.sink.submit_result(&result) {
            Ok(()) => info!(
                player = %result.player_id,
                score = result.score,
                stage = result.stage,
                play_at = %result.play_at,
                mileage = result.mileage(),
                "result submitted"
            ),
            Err(err) => error!(error = %err, "result submission failed"),
        }
        self.result = Some(result);
    }
}

/// Request the current stage's data once per (episode, stage)
fn load_stage<W, C>(
    state: &mut GameState,
    words: &W,
    configs: &C,
    loaded: &mut Option<(u32, u32)>,
) where
    W: WordSource,
    C: StageConfigSource,
{
    if state.status() != GameStatus::Playing {
        return;
    }
    let key = (state.episode_id(), state.stage());
    if *loaded == Some(key) {
        return;
    }
    *loaded = Some(key);

    let stage = state.stage();
    let word_list = words.fetch_words(stage).unwrap_or_else(|err| {
        warn!(stage, error = %err, "word list unavailable");
        Vec::new()
    });
    let config = configs.fetch_stage_config(stage).unwrap_or_else(|err| {
        warn!(stage, error = %err, "stage config unavailable");
        None
    });

    match config {
        Some(cfg) => info!(
            stage,
            words = word_list.len(),
            fall_secs = cfg.fall_duration_secs,
            spawn_secs = cfg.spawn_interval_secs,
            clear_target = cfg.clear_target(),
            "stage loaded"
        ),
        None => warn!(stage, "no usable stage config; stage stays idle"),
    }
    state.load_stage(word_list, config);
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::EffectActivated { kind } => {
            info!(effect = kind.as_str(), "effect activated")
        }
        GameEvent::EffectReplaced { previous, next } => info!(
            previous = previous.as_str(),
            next = next.as_str(),
            "effect replaced"
        ),
        GameEvent::EffectExpired { kind } => debug!(effect = kind.as_str(), "effect expired"),
        GameEvent::EffectCancelled { kind } => {
            info!(effect = kind.as_str(), "effect cancelled")
        }
        GameEvent::StageCleared { stage } => info!(stage, "stage cleared"),
        GameEvent::StageStarted { stage } => info!(stage, "stage started"),
        GameEvent::GameOver { stage, score } => info!(stage, score, "game over"),
        other => debug!(event = ?other, "game event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{MemoryCatalog, MemoryScoreSink, SourceError, SourceResult};
    use typefall_core::Word;
    use typefall_types::{EffectKind, StageConfig, STAGE_CLEAR_DISPLAY_MS};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_stage(
                1,
                words(&["apple"]),
                StageConfig::sanitized(10.0, 1.0, None, Some(2)),
            )
            .with_stage(
                2,
                words(&["banana"]),
                StageConfig::sanitized(5.0, 1.0, None, Some(2)),
            )
    }

    fn session(
        catalog: &MemoryCatalog,
    ) -> Session<&MemoryCatalog, &MemoryCatalog, MemoryScoreSink> {
        Session::new(
            EngineConfig::new("tester").with_seed(9),
            catalog,
            catalog,
            MemoryScoreSink::default(),
        )
    }

    struct FailingSource;

    impl WordSource for FailingSource {
        fn fetch_words(&self, _stage: u32) -> SourceResult<Vec<String>> {
            Err(SourceError::Invalid("offline".into()))
        }
    }

    impl StageConfigSource for FailingSource {
        fn fetch_stage_config(&self, stage: u32) -> SourceResult<Option<StageConfig>> {
            Err(SourceError::UnknownStage(stage))
        }
    }

    #[test]
    fn test_start_loads_first_stage() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session.start();

        assert_eq!(session.state().status(), GameStatus::Playing);
        assert_eq!(session.state().word_list(), &words(&["apple"])[..]);
        assert_eq!(session.state().clear_target(), 2);
    }

    #[test]
    fn test_failing_sources_leave_stage_idle() {
        let mut session = Session::new(
            EngineConfig::default(),
            FailingSource,
            FailingSource,
            MemoryScoreSink::default(),
        );
        session.start();
        let report = session.advance(5_000);

        assert_eq!(report.spawned, 0);
        assert!(session.state().words().is_empty());
        assert!(session.state().stage_config().is_none());
        assert!(!session.is_finished());
    }

    #[test]
    fn test_stage_transition_loads_next_stage() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session.start();

        // Spawn, then type what is on screen until the quota is met.
        let mut guard = 0;
        while session.state().status() == GameStatus::Playing && guard < 1000 {
            session.advance(50);
            let texts: Vec<String> = session
                .state()
                .words()
                .iter()
                .filter(|w| !w.is_special)
                .map(|w| w.text.clone())
                .collect();
            for text in texts {
                session.submit_input(&text);
            }
            guard += 1;
        }
        assert_eq!(session.state().status(), GameStatus::StageClear);

        session.advance(STAGE_CLEAR_DISPLAY_MS);
        assert_eq!(session.state().stage(), 2);
        assert_eq!(session.state().word_list(), &words(&["banana"])[..]);
        assert!(session.state().landmines().is_empty());
    }

    #[test]
    fn test_slow_down_uses_stage_one_baseline() {
        let catalog = catalog();
        let mut session = Session::new(
            EngineConfig::new("p").with_start_stage(2),
            &catalog,
            &catalog,
            MemoryScoreSink::default(),
        );
        session.start();
        assert_eq!(session.state().pixel_increment(), 6.0);

        session.state.activate_effect(EffectKind::SlowDown, None);
        assert_eq!(session.state().pixel_increment(), 3.0);
    }

    #[test]
    fn test_result_submitted_exactly_once() {
        let catalog = MemoryCatalog::new().with_stage(
            1,
            words(&["x"]),
            StageConfig::sanitized(0.5, 0.05, None, None),
        );
        let mut session = Session::new(
            EngineConfig::new("p1"),
            &catalog,
            &catalog,
            MemoryScoreSink::default(),
        );
        session.start();

        let mut guard = 0;
        while !session.is_finished() && guard < 10_000 {
            session.advance(50);
            guard += 1;
        }
        assert!(session.is_finished());

        session.advance(10_000);
        session.finish();
        assert_eq!(session.sink().results.len(), 1);
        let result = &session.sink().results[0];
        assert_eq!(result.player_id, "p1");
        assert_eq!(result.score, session.state().score());
    }

    #[test]
    fn test_finish_submits_abandoned_run() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session.start();
        session.state.insert_word(Word::new(0, "apple", 0).at(200.0));
        session.submit_input("apple");
        session.advance(1_000);

        let result = session.finish().cloned().unwrap();
        assert_eq!(result.score, 50);
        assert_eq!(result.play_time_ms, 1_000);
        assert_eq!(session.sink().results.len(), 1);

        session.finish();
        assert_eq!(session.sink().results.len(), 1);
    }

    #[test]
    fn test_restart_allows_new_submission() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session.start();
        session.finish();
        session.restart();

        assert_eq!(session.state().episode_id(), 1);
        assert!(session.result().is_none());
        assert_eq!(session.state().word_list(), &words(&["apple"])[..]);
        session.finish();
        assert_eq!(session.sink().results.len(), 2);
    }

    #[test]
    fn test_pause_resume() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session.start();
        session.pause();
        assert_eq!(session.advance(1_000).movement_ticks, 0);
        session.resume();
        assert_eq!(session.advance(1_000).movement_ticks, 20);
    }
}
