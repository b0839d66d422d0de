//! Runtime - async driver and file-backed collaborators
//!
//! - [`driver`]: tokio task with movement and effect intervals, a control
//!   channel and a snapshot watch channel
//! - [`store`]: JSON word/stage catalog and JSON-lines result sink
//! - [`builtin`]: catalog used when no files are configured
//! - [`config`]: environment configuration
//! - [`bot`]: autoplay typist
//!
//! # Environment Variables
//!
//! See [`config`] for the full table. The common ones:
//!
//! - `TYPEFALL_WORDS_PATH` / `TYPEFALL_STAGES_PATH`: JSON catalog (both required)
//! - `TYPEFALL_RESULTS_PATH`: append results as JSON lines
//! - `TYPEFALL_SEED`: replay a game
//!
//! # Example
//!
//! ```no_run
//! use typefall_runtime::{open_catalog, open_sink, Driver, RuntimeConfig};
//! use typefall_runtime::engine::Session;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = RuntimeConfig::from_env();
//! let catalog = std::sync::Arc::new(open_catalog(&config)?);
//! let session = Session::new(
//!     config.engine_config(),
//!     catalog.clone(),
//!     catalog,
//!     open_sink(&config),
//! );
//!
//! let driver = Driver::spawn(session);
//! driver.input("사과").await;
//! let result = driver.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod builtin;
pub mod config;
pub mod driver;
pub mod store;

use anyhow::Context;
use tracing::{info, warn};

pub use typefall_engine as engine;

pub use bot::{autoplay, AutoTyper};
pub use builtin::builtin_catalog;
pub use config::RuntimeConfig;
pub use driver::{run_session, Control, Driver};
pub use store::{FileCatalog, JsonlScoreSink, LogScoreSink, ResultRecord};

use typefall_engine::ScoreSink;

/// Score sink selected by configuration
pub type BoxedSink = Box<dyn ScoreSink + Send>;

/// Load the configured JSON catalog, or the built-in one when no paths are set
pub fn open_catalog(config: &RuntimeConfig) -> anyhow::Result<FileCatalog> {
    match (&config.words_path, &config.stages_path) {
        (Some(words), Some(stages)) => FileCatalog::load(words, stages).with_context(|| {
            format!(
                "failed to load catalog from {} and {}",
                words.display(),
                stages.display()
            )
        }),
        (None, None) => {
            info!("using built-in catalog");
            Ok(builtin_catalog())
        }
        _ => {
            warn!("TYPEFALL_WORDS_PATH and TYPEFALL_STAGES_PATH must be set together; using built-in catalog");
            Ok(builtin_catalog())
        }
    }
}

/// JSON-lines sink when a results path is set, log-only otherwise
pub fn open_sink(config: &RuntimeConfig) -> BoxedSink {
    match &config.results_path {
        Some(path) => Box::new(JsonlScoreSink::new(path.clone())),
        None => Box::new(LogScoreSink),
    }
}
