//! Scoring module - NES line scores with a combo/clutch window
//!
//! Line clears score `LINE_SCORES[lines] * (level + 1)`, scaled by a combo
//! multiplier and doubled for clutch clears.
//!
//! The combo uses an accumulating window: every clear adds time that depends on
//! how many lines it cleared (capped), the window drains with played time, and
//! the chain ends when it runs out or when a piece locks without clearing.
//! A clear that lands with at most `clutch_threshold_ms` left on an open window
//! is a clutch clear.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{
    CLUTCH_THRESHOLD_MS, COMBO_MAX_WINDOW_MS, COMBO_WINDOW_MS, HARD_DROP_POINTS_PER_CELL,
    LINES_PER_LEVEL, LINE_SCORES, SCORE_CAP, SOFT_DROP_POINTS_PER_CELL,
};

/// Tunable combo parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringConfig {
    /// Window time added per clear, indexed by lines cleared (ms)
    pub combo_window_ms: [u32; 5],
    /// Window ceiling (ms)
    pub combo_max_window_ms: u32,
    /// Remaining window at or below which a clear is clutch (ms)
    pub clutch_threshold_ms: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            combo_window_ms: COMBO_WINDOW_MS,
            combo_max_window_ms: COMBO_MAX_WINDOW_MS,
            clutch_threshold_ms: CLUTCH_THRESHOLD_MS,
        }
    }
}

/// Points awarded by one line clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearAward {
    /// Points actually added (after multiplier, clutch, and cap)
    pub points: u32,
    /// Combo chain length including this clear
    pub combo: u32,
    /// Multiplier applied, in tenths
    pub multiplier_tenths: u32,
    pub clutch: bool,
}

/// Result of recording a clear against the running totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub award: LineClearAward,
    pub lines_total: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ClearOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Base points for a clear before any combo scaling
/// lines: number of lines cleared (1-4)
/// level: current level (0-based)
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level.saturating_add(1))
}

/// Combo multiplier in tenths; never decreases as the chain grows
pub fn combo_multiplier_tenths(combo: u32) -> u32 {
    match combo {
        0 | 1 => 10,
        2 => 12,
        3 | 4 => 15,
        _ => 20,
    }
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS_PER_CELL
    } else {
        SOFT_DROP_POINTS_PER_CELL
    };
    cells.saturating_mul(per_cell)
}

/// Level earned by line count alone, one per `LINES_PER_LEVEL` lines
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ComboState {
    count: u32,
    remaining_ms: u32,
}

impl ComboState {
    fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }
}

/// Running score, lines, level and combo for one game
#[derive(Debug, Clone)]
pub struct Scoring {
    config: ScoringConfig,
    start_level: u32,
    score: u32,
    lines: u32,
    level: u32,
    combo: ComboState,
}

impl Scoring {
    pub fn new(config: ScoringConfig, start_level: u32) -> Self {
        Self {
            config,
            start_level,
            score: 0,
            lines: 0,
            level: start_level,
            combo: ComboState::default(),
        }
    }

    /// Zero everything for a new game
    pub fn reset(&mut self) {
        *self = Self::new(self.config, self.start_level);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Current combo chain length (0 when no window is open)
    pub fn combo(&self) -> u32 {
        self.combo.count
    }

    /// Add points, saturating at the score cap
    pub fn add_points(&mut self, points: u32) -> u32 {
        let before = self.score;
        self.score = self.score.saturating_add(points).min(SCORE_CAP);
        self.score - before
    }

    /// Score a clear of `lines` rows at `level`, advancing the combo chain
    ///
    /// A zero-line call breaks the chain and awards nothing.
    pub fn add_lines_score(&mut self, lines: usize, level: u32) -> LineClearAward {
        if lines == 0 {
            self.break_combo();
            return LineClearAward::default();
        }

        let was_active = self.combo.is_active();
        let clutch = was_active && self.combo.remaining_ms <= self.config.clutch_threshold_ms;

        let count = if was_active { self.combo.count + 1 } else { 1 };
        let extension = self.config.combo_window_ms[lines.min(4)];
        let remaining = if was_active { self.combo.remaining_ms } else { 0 };
        self.combo = ComboState {
            count,
            remaining_ms: remaining
                .saturating_add(extension)
                .min(self.config.combo_max_window_ms),
        };

        let multiplier_tenths = combo_multiplier_tenths(count);
        let base = line_clear_points(lines, level) as u64;
        let mut points = base * multiplier_tenths as u64 / 10;
        if clutch {
            points *= 2;
        }
        let points = self.add_points(points.min(SCORE_CAP as u64) as u32);

        LineClearAward {
            points,
            combo: count,
            multiplier_tenths,
            clutch,
        }
    }

    /// Score a clear at the current level, then add the lines and update the level
    pub fn record_clear(&mut self, lines: usize) -> ClearOutcome {
        let level_before = self.level;
        let award = self.add_lines_score(lines, level_before);
        self.lines = self.lines.saturating_add(lines as u32);
        self.level = self.start_level.max(calculate_level(self.lines));

        ClearOutcome {
            award,
            lines_total: self.lines,
            level_before,
            level_after: self.level,
        }
    }

    /// Award drop points for `distance` cells
    pub fn add_drop_score(&mut self, distance: u32, is_hard: bool) -> u32 {
        self.add_points(calculate_drop_score(distance, is_hard))
    }

    /// End the combo chain
    pub fn break_combo(&mut self) {
        self.combo = ComboState::default();
    }

    /// Drain the combo window by `elapsed_ms`; the chain ends when it empties
    pub fn tick(&mut self, elapsed_ms: u32) {
        if !self.combo.is_active() {
            return;
        }
        self.combo.remaining_ms = self.combo.remaining_ms.saturating_sub(elapsed_ms);
        if self.combo.remaining_ms == 0 {
            self.combo.count = 0;
        }
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), 0)
    }
}
