//! Game engine - the stateful simulation on top of the pure core
//!
//! Owns the board, generator, scoring and frame timers for one player and
//! advances them from elapsed time plus an input snapshot. Audio and
//! persistence hang off the [`EventSink`] seam; rendering reads the
//! [`GameSnapshot`](crate::core::GameSnapshot) returned by every update.
//!
//! # Example
//!
//! ```
//! use classic_tetris_engine::{EngineConfig, GameEngine};
//! use classic_tetris_engine::types::{GameStatus, InputSnapshot};
//!
//! let mut engine = GameEngine::new(EngineConfig::default());
//! let start = InputSnapshot { enter: true, ..InputSnapshot::default() };
//! let snap = engine.update(16, start);
//! assert_eq!(snap.status, GameStatus::Playing);
//! assert!(snap.current.is_some());
//! ```

pub mod config;
pub mod engine;
pub mod events;

pub use classic_tetris_core as core;
pub use classic_tetris_types as types;

pub use crate::core::{Randomizer, RotationPolicy};
pub use config::{ConfigError, EngineConfig};
pub use engine::{GameEngine, RotateResult};
pub use events::{EventSink, NullSink};
