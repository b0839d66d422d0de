//! Typefall (workspace facade crate).
//!
//! Exposes `typefall::{core,engine,runtime,types}` while the implementation
//! lives in dedicated crates under `crates/`.

pub use typefall_core as core;
pub use typefall_engine as engine;
pub use typefall_runtime as runtime;
pub use typefall_types as types;
