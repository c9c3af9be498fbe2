//! Core game logic - pure, deterministic, and testable
//!
//! Everything needed to simulate classic falling-block play without any
//! rendering, audio, input device or I/O dependencies:
//!
//! - **Deterministic**: the same seed and inputs replay the same game
//! - **Frame-accurate**: gravity, DAS, ARE and the line-clear flash count 60 Hz
//!   frames derived from elapsed time
//! - **Zero-allocation**: board operations and line detection use fixed arrays
//!
//! # Module Structure
//!
//! - [`board`]: 10x22 grid (2 hidden rows) with collision, placement and line clearing
//! - [`pieces`]: Piece catalog, rotation masks, classic (no-kick) rotation
//! - [`rng`]: Classic memoryless and 7-bag piece generators over an LCG
//! - [`scoring`]: NES line scores, drop points, combo window and clutch bonus
//! - [`timing`]: Frame clock, gravity curve, DAS and ARE
//! - [`snapshot`]: Read-only state handed to renderers
//!
//! # Example
//!
//! ```
//! use classic_tetris_core::{Board, Piece};
//! use classic_tetris_core::types::PieceKind;
//!
//! let board = Board::new();
//! let piece = Piece::spawn(PieceKind::O);
//! assert!(board.is_valid_position(&piece));
//!
//! // An O piece spawning in the top visible rows falls 18 rows to the floor.
//! assert_eq!(board.drop_distance(&piece), 18);
//! ```

pub mod board;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timing;

pub use classic_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, RowList, VisibleGrid};
pub use pieces::{get_shape, rotate_piece, try_rotate, Piece, RotationPolicy};
pub use rng::{PieceGenerator, Randomizer, SimpleRng};
pub use scoring::{
    calculate_drop_score, calculate_level, line_clear_points, ClearOutcome, LineClearAward,
    Scoring, ScoringConfig,
};
pub use snapshot::{GameSnapshot, PieceSnapshot};
pub use timing::{are_frames, frames_per_cell, AutoShift, FrameClock, Gravity, Shift, TimingConfig};
