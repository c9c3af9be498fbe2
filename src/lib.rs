//! Classic Tetris (workspace facade crate).
//!
//! Exposes `classic_tetris::{types,core,engine}` while the implementation lives
//! in dedicated crates under `crates/`.

pub use classic_tetris_core as core;
pub use classic_tetris_engine as engine;
pub use classic_tetris_types as types;
