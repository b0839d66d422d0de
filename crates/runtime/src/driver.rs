//! Async driver
//!
//! Runs a [`Session`] on a tokio task with two periodic timers (movement and
//! effect countdown) and a control channel. Every handled tick or command
//! publishes a fresh [`GameSnapshot`] on a watch channel.
//!
//! Pausing leaves the timers running but the session ignores them; resuming
//! and restarting reset both intervals so no backlog of ticks fires.

use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use typefall_engine::core::GameSnapshot;
use typefall_engine::types::{EFFECT_TICK_MS, TICK_MS};
use typefall_engine::{GameResult, ScoreSink, Session, StageConfigSource, WordSource};

const CONTROL_BUFFER: usize = 64;

/// Command delivered to the driver task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Input(String),
    Pause,
    Resume,
    Restart,
    Stop,
}

/// Running driver instance
pub struct Driver {
    control_tx: mpsc::Sender<Control>,
    snapshots: watch::Receiver<GameSnapshot>,
    task: JoinHandle<Option<GameResult>>,
}

impl Driver {
    /// Start `session` on a new tokio task. Must be called inside a runtime.
    pub fn spawn<W, C, S>(session: Session<W, C, S>) -> Self
    where
        W: WordSource + Send + 'static,
        C: StageConfigSource + Send + 'static,
        S: ScoreSink + Send + 'static,
    {
        let (control_tx, control_rx) = mpsc::channel(CONTROL_BUFFER);
        let (snapshot_tx, snapshots) = watch::channel(session.snapshot());
        let task = tokio::spawn(run_session(session, control_rx, snapshot_tx));

        Self {
            control_tx,
            snapshots,
            task,
        }
    }

    /// Returns false once the driver has stopped
    pub async fn send(&self, control: Control) -> bool {
        self.control_tx.send(control).await.is_ok()
    }

    pub async fn input(&self, text: impl Into<String>) -> bool {
        self.send(Control::Input(text.into())).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the driver to stop and wait for the final result
    pub async fn stop(self) -> anyhow::Result<Option<GameResult>> {
        let _ = self.control_tx.send(Control::Stop).await;
        self.join().await
    }

    /// Wait for the driver to end on its own (game over or stop)
    pub async fn join(self) -> anyhow::Result<Option<GameResult>> {
        self.task.await.context("driver task failed")
    }
}

/// Start the session and drive it until game over or [`Control::Stop`].
///
/// Returns the submitted result.
pub async fn run_session<W, C, S>(
    mut session: Session<W, C, S>,
    mut control_rx: mpsc::Receiver<Control>,
    snapshot_tx: watch::Sender<GameSnapshot>,
) -> Option<GameResult>
where
    W: WordSource,
    C: StageConfigSource,
    S: ScoreSink,
{
    session.start();
    snapshot_tx.send_replace(session.snapshot());

    let tick_period = Duration::from_millis(TICK_MS as u64);
    let effect_period = Duration::from_millis(EFFECT_TICK_MS as u64);

    let mut movement = time::interval(tick_period);
    movement.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut effect = time::interval_at(Instant::now() + effect_period, effect_period);
    effect.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut effect_generation = session.state().effect_generation();

    info!("driver started");

    while !session.is_finished() {
        tokio::select! {
            _ = movement.tick() => {
                session.movement_tick();
            }
            _ = effect.tick() => {
                session.effect_tick();
            }
            control = control_rx.recv() => match control {
                Some(Control::Input(text)) => {
                    session.submit_input(&text);
                }
                Some(Control::Pause) => session.pause(),
                Some(Control::Resume) => {
                    session.resume();
                    movement.reset();
                    effect.reset();
                }
                Some(Control::Restart) => {
                    session.restart();
                    movement.reset();
                    effect.reset();
                }
                Some(Control::Stop) | None => {
                    debug!("stop requested");
                    break;
                }
            },
        }

        // A new effect gets a full second before its first countdown step.
        if session.state().effect_generation() != effect_generation {
            effect_generation = session.state().effect_generation();
            effect.reset();
        }

        snapshot_tx.send_replace(session.snapshot());
    }

    let result = session.finish().cloned();
    snapshot_tx.send_replace(session.snapshot());
    info!(
        score = result.as_ref().map(|r| r.score),
        "driver stopped"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use typefall_engine::types::{GameStatus, StageConfig};
    use typefall_engine::{EngineConfig, MemoryCatalog, MemoryScoreSink};

    fn catalog(fall_secs: f32, spawn_secs: f32) -> MemoryCatalog {
        MemoryCatalog::new().with_stage(
            1,
            vec!["apple".to_string()],
            StageConfig::sanitized(fall_secs, spawn_secs, None, Some(100)),
        )
    }

    fn spawn_driver(catalog: MemoryCatalog) -> Driver {
        let catalog = std::sync::Arc::new(catalog);
        Driver::spawn(Session::new(
            EngineConfig::new("driver-test").with_seed(3),
            catalog.clone(),
            catalog,
            MemoryScoreSink::default(),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_drives_simulation() {
        let driver = spawn_driver(catalog(10.0, 1.0));

        time::sleep(Duration::from_millis(1_010)).await;
        let snap = driver.snapshot();
        assert_eq!(snap.status, GameStatus::Playing);
        assert!((950..=1_050).contains(&snap.total_elapsed_ms), "{}", snap.total_elapsed_ms);
        assert!(!snap.words.is_empty());

        let result = driver.stop().await.unwrap().unwrap();
        assert_eq!(result.player_id, "driver-test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_input_is_applied() {
        let driver = spawn_driver(catalog(10.0, 1.0));
        time::sleep(Duration::from_millis(120)).await;

        assert!(driver.input("apple").await);
        time::sleep(Duration::from_millis(10)).await;

        let snap = driver.snapshot();
        assert!(snap.score >= 50);
        driver.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_time() {
        let driver = spawn_driver(catalog(10.0, 1.0));
        time::sleep(Duration::from_millis(500)).await;

        assert!(driver.send(Control::Pause).await);
        time::sleep(Duration::from_millis(10)).await;
        let paused_at = driver.snapshot().total_elapsed_ms;
        assert!(driver.snapshot().paused);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(driver.snapshot().total_elapsed_ms, paused_at);

        assert!(driver.send(Control::Resume).await);
        time::sleep(Duration::from_millis(500)).await;
        let resumed = driver.snapshot().total_elapsed_ms;
        assert!(resumed > paused_at);
        assert!(resumed <= paused_at + 600);

        driver.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_ends_driver() {
        // Words cross the board in half a second and nobody types.
        let driver = spawn_driver(catalog(0.5, 0.05));
        let mut updates = driver.subscribe();

        let finished = time::timeout(Duration::from_secs(120), async {
            loop {
                if updates.borrow_and_update().status == GameStatus::GameOver {
                    break;
                }
                if updates.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;
        assert!(finished.is_ok());

        let result = driver.join().await.unwrap().unwrap();
        assert_eq!(result.player_id, "driver-test");
    }

    #[tokio::test(start_paused = true)]
    async fn test_effect_countdown_starts_at_activation() {
        let driver = spawn_driver(catalog(10.0, 0.05));

        let mut activated = None;
        for _ in 0..200 {
            time::sleep(Duration::from_millis(50)).await;
            if driver.snapshot().words.iter().any(|w| w.is_special) {
                assert!(driver.input("apple").await);
                time::sleep(Duration::from_millis(10)).await;
                activated = driver.snapshot().effect;
                break;
            }
        }
        let effect = activated.expect("a special word should appear");
        let full = effect.kind.duration_secs();
        assert_eq!(effect.remaining_secs, full);

        time::sleep(Duration::from_millis(900)).await;
        let snap = driver.snapshot();
        assert_eq!(snap.effect.map(|e| e.remaining_secs), Some(full));

        time::sleep(Duration::from_millis(200)).await;
        let snap = driver.snapshot();
        assert_eq!(snap.effect.map(|e| e.remaining_secs), Some(full - 1));

        driver.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_episode() {
        let driver = spawn_driver(catalog(10.0, 1.0));
        time::sleep(Duration::from_millis(300)).await;

        assert!(driver.send(Control::Restart).await);
        time::sleep(Duration::from_millis(10)).await;
        let snap = driver.snapshot();
        assert_eq!(snap.episode_id, 1);
        assert!(snap.total_elapsed_ms < 100);
        assert_eq!(snap.score, 0);

        driver.stop().await.unwrap();
    }
}
