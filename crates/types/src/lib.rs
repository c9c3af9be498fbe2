//! Shared types - plain data and tuning constants
//!
//! Everything here is plain data: the closed set of piece kinds, the per-tick
//! input snapshot handed in by the host, the outward-facing game status and
//! events, and the tuning constants the simulation defaults to.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible height**: 20 rows
//! - **Hidden buffer**: 2 rows above the visible field (spawn space and
//!   game-over detection)
//!
//! Board rows are numbered from the top of the hidden buffer, so rows `0..2`
//! are hidden and rows `2..22` are visible.
//!
//! # Frame Timing
//!
//! The simulation runs on a fixed 60 Hz frame budget and converts the host's
//! elapsed time into whole frames. All gravity/DAS/ARE constants below are in
//! frames.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_US` | 16667 | One simulation frame in microseconds |
//! | `DEFAULT_DAS_INITIAL_FRAMES` | 16 | Hold time before auto-shift starts |
//! | `DEFAULT_DAS_REPEAT_FRAMES` | 6 | Frames between auto-shift repeats |
//! | `DEFAULT_ARE_BASE_FRAMES` | 10 | Entry delay for locks near the floor |
//! | `DEFAULT_ARE_STEP_FRAMES` | 2 | Extra entry delay per height step |
//! | `LINE_CLEAR_FLASH_FRAMES` | 18 | Flash before full rows are removed |
//!
//! # Examples
//!
//! ```
//! use classic_tetris_types::{PieceKind, InputSnapshot, BOARD_WIDTH, VISIBLE_HEIGHT};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(PieceKind::from_index(piece.index()), Some(PieceKind::T));
//!
//! let prev = InputSnapshot::default();
//! let now = InputSnapshot { rotate_cw: true, ..InputSnapshot::default() };
//! assert!(now.pressed_since(&prev).rotate_cw);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(VISIBLE_HEIGHT, 20);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Playfield columns
pub const BOARD_WIDTH: u8 = 10;

/// Visible playfield height (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden buffer rows above the visible playfield
pub const HIDDEN_ROWS: u8 = 2;

/// Total rows tracked by the board (hidden + visible)
pub const TOTAL_HEIGHT: u8 = VISIBLE_HEIGHT + HIDDEN_ROWS;

/// One simulation frame in microseconds (60 Hz)
pub const FRAME_US: u64 = 16_667;

/// Upper bound on frames simulated by a single `update` call.
pub const MAX_CATCH_UP_FRAMES: u32 = 10;

/// Gravity accumulator resolution (sub-frame units added per frame).
pub const GRAVITY_UNITS_PER_FRAME: u32 = 16;

/// Frames per cell for levels 0-9.
pub const GRAVITY_TABLE: [u32; 10] = [48, 43, 38, 33, 28, 23, 18, 13, 8, 6];

/// Delayed auto shift: frames a direction must be held before repeating.
pub const DEFAULT_DAS_INITIAL_FRAMES: u32 = 16;

/// Auto repeat rate: frames between repeated shifts once DAS has charged.
pub const DEFAULT_DAS_REPEAT_FRAMES: u32 = 6;

/// Entry delay for a piece that locked in the bottom rows.
pub const DEFAULT_ARE_BASE_FRAMES: u32 = 10;

/// Additional entry delay per height step.
pub const DEFAULT_ARE_STEP_FRAMES: u32 = 2;

/// Rows per entry delay height step.
pub const DEFAULT_ARE_ROWS_PER_STEP: u32 = 4;

/// Frames the full rows flash before being removed.
pub const LINE_CLEAR_FLASH_FRAMES: u32 = 18;

/// Soft drop acceleration added per held frame (gravity units).
pub const SOFT_DROP_RAMP: u32 = 4;

/// Soft drop acceleration ceiling (gravity units per frame).
pub const SOFT_DROP_CAP: u32 = 368;

/// Line clear scoring table (NES values), indexed by lines cleared.
///
/// Points are multiplied by `level + 1`.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Soft drop points per cell.
pub const SOFT_DROP_POINTS_PER_CELL: u32 = 1;

/// Hard drop points per cell.
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Score ceiling; additions saturate here.
pub const SCORE_CAP: u32 = 9_999_999;

/// Lines per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Highest selectable start level.
pub const MAX_START_LEVEL: u32 = 29;

/// Combo window added per clear, indexed by lines cleared (milliseconds).
pub const COMBO_WINDOW_MS: [u32; 5] = [0, 4_000, 6_000, 8_000, 12_000];

/// Combo window ceiling (milliseconds).
pub const COMBO_MAX_WINDOW_MS: u32 = 30_000;

/// A clear landing with at most this much window left counts as clutch.
pub const CLUTCH_THRESHOLD_MS: u32 = 1_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_timing_defaults() {
        assert_eq!(TOTAL_HEIGHT, 22);
        assert_eq!(DEFAULT_DAS_INITIAL_FRAMES, 16);
        assert_eq!(DEFAULT_DAS_REPEAT_FRAMES, 6);
        assert_eq!(DEFAULT_ARE_BASE_FRAMES, 10);
        assert_eq!(DEFAULT_ARE_STEP_FRAMES, 2);
        assert_eq!(GRAVITY_TABLE[0], 48);
        assert!(GRAVITY_TABLE.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn edge_detection_only_reports_new_presses() {
        let prev = InputSnapshot {
            left: true,
            hard_drop: true,
            ..InputSnapshot::default()
        };
        let now = InputSnapshot {
            left: true,
            hard_drop: false,
            rotate_ccw: true,
            ..InputSnapshot::default()
        };

        let pressed = now.pressed_since(&prev);
        assert!(!pressed.left);
        assert!(!pressed.hard_drop);
        assert!(pressed.rotate_ccw);
    }

    #[test]
    fn piece_kind_index_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(PieceKind::from_index(7), None);
    }
}

/// The seven tetrominoes
///
/// Closed set: shapes, colors and spawn offsets live in the core catalog,
/// indexed by [`PieceKind::index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Single-letter lowercase name.
    pub fn as_str(&self) -> &'static str {
        const NAMES: [&str; 7] = ["i", "o", "t", "s", "z", "j", "l"];
        NAMES[self.index()]
    }

    /// Parse a single-letter name in either case.
    ///
    /// ```
    /// use classic_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("L"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    /// Position in [`PieceKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Inverse of [`PieceKind::index`]. Indices outside `0..7` are not piece kinds.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Outward-facing game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GameStatus {
    #[default]
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Menu => "menu",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
    }
}

/// Normalized input state for one host tick.
///
/// Every field means "currently held". Edge detection (just pressed vs. held)
/// happens in the engine via [`InputSnapshot::pressed_since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub hard_drop: bool,
    pub soft_drop: bool,
    pub pause: bool,
    pub reset: bool,
    pub enter: bool,
    pub music_toggle: bool,
}

impl InputSnapshot {
    /// Inputs held now that were not held in `prev`.
    pub fn pressed_since(&self, prev: &InputSnapshot) -> InputSnapshot {
        InputSnapshot {
            left: self.left && !prev.left,
            right: self.right && !prev.right,
            down: self.down && !prev.down,
            rotate_cw: self.rotate_cw && !prev.rotate_cw,
            rotate_ccw: self.rotate_ccw && !prev.rotate_ccw,
            hard_drop: self.hard_drop && !prev.hard_drop,
            soft_drop: self.soft_drop && !prev.soft_drop,
            pause: self.pause && !prev.pause,
            reset: self.reset && !prev.reset,
            enter: self.enter && !prev.enter,
            music_toggle: self.music_toggle && !prev.music_toggle,
        }
    }

    /// Either soft drop binding is held.
    pub fn soft_drop_held(&self) -> bool {
        self.down || self.soft_drop
    }
}

/// Fire-and-forget notifications for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "camelCase"))]
pub enum GameEvent {
    /// Active piece shifted one column
    Move,
    /// Active piece rotated
    Rotate,
    /// Piece locked after gravity could not move it further
    SoftLock,
    /// Piece locked by a hard drop
    HardLock,
    /// Full rows removed
    LineClear { lines: u32 },
    /// Level increased
    LevelUp { level: u32 },
    /// Clear extended a combo chain of at least two
    Combo { count: u32 },
    GameOver,
    MusicToggled,
}

/// Final record handed to the persistence collaborator on game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct FinalStats {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Played time, excluding time spent paused
    pub duration_ms: u64,
}
