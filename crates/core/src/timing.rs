//! Timing module - frame clock, gravity, DAS and ARE
//!
//! The host reports elapsed wall time; [`FrameClock`] turns it into whole
//! 60 Hz frames so the rest of the simulation can count frames regardless of
//! the host's real frame rate.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{
    DEFAULT_ARE_BASE_FRAMES, DEFAULT_ARE_ROWS_PER_STEP, DEFAULT_ARE_STEP_FRAMES,
    DEFAULT_DAS_INITIAL_FRAMES, DEFAULT_DAS_REPEAT_FRAMES, FRAME_US, GRAVITY_TABLE,
    GRAVITY_UNITS_PER_FRAME, LINE_CLEAR_FLASH_FRAMES, MAX_CATCH_UP_FRAMES, SOFT_DROP_CAP,
    SOFT_DROP_RAMP, TOTAL_HEIGHT,
};

/// Frame-count tuning for gravity, DAS, ARE and the line-clear flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    pub das_initial_delay_frames: u32,
    pub das_repeat_rate_frames: u32,
    pub are_base_frames: u32,
    pub are_step_frames: u32,
    pub are_rows_per_step: u32,
    pub line_clear_flash_frames: u32,
    /// Soft drop bonus gained per held frame (gravity units)
    pub soft_drop_ramp: u32,
    /// Soft drop bonus ceiling (gravity units per frame)
    pub soft_drop_cap: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            das_initial_delay_frames: DEFAULT_DAS_INITIAL_FRAMES,
            das_repeat_rate_frames: DEFAULT_DAS_REPEAT_FRAMES,
            are_base_frames: DEFAULT_ARE_BASE_FRAMES,
            are_step_frames: DEFAULT_ARE_STEP_FRAMES,
            are_rows_per_step: DEFAULT_ARE_ROWS_PER_STEP,
            line_clear_flash_frames: LINE_CLEAR_FLASH_FRAMES,
            soft_drop_ramp: SOFT_DROP_RAMP,
            soft_drop_cap: SOFT_DROP_CAP,
        }
    }
}

/// Frames a piece takes to fall one cell at `level`
///
/// Levels 0-9 each have their own speed; 10-19 step down in groups, 20-29
/// share one speed and 30+ is the one-frame floor.
pub fn frames_per_cell(level: u32) -> u32 {
    match level {
        0..=9 => GRAVITY_TABLE[level as usize],
        10..=12 => 5,
        13..=15 => 4,
        16..=18 => 3,
        19..=29 => 2,
        _ => 1,
    }
}

/// Entry delay after a piece locks with its lowest mino on board row `lowest_row`
///
/// Locks in the bottom two rows get the base delay; every further
/// `are_rows_per_step` rows up adds `are_step_frames`.
pub fn are_frames(lowest_row: i8, config: &TimingConfig) -> u32 {
    let floor = TOTAL_HEIGHT as i32 - 1;
    let height = (floor - lowest_row as i32).max(0) as u32;
    let steps = (height + 2) / config.are_rows_per_step.max(1);
    config
        .are_base_frames
        .saturating_add(config.are_step_frames.saturating_mul(steps))
}

/// Converts elapsed milliseconds into whole simulation frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    accumulator_us: u64,
}

impl FrameClock {
    /// Add elapsed time and return how many frames are due
    ///
    /// At most [`MAX_CATCH_UP_FRAMES`] are returned; a larger backlog is dropped.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.accumulator_us += elapsed_ms as u64 * 1_000;
        let due = self.accumulator_us / FRAME_US;
        if due > MAX_CATCH_UP_FRAMES as u64 {
            self.accumulator_us = 0;
            return MAX_CATCH_UP_FRAMES;
        }
        self.accumulator_us -= due * FRAME_US;
        due as u32
    }

    pub fn reset(&mut self) {
        self.accumulator_us = 0;
    }
}

/// Gravity accumulator with a progressive soft drop
#[derive(Debug, Clone, Copy, Default)]
pub struct Gravity {
    accumulator: u32,
    soft_bonus: u32,
}

impl Gravity {
    /// Advance one frame; returns true when the piece should fall one cell
    ///
    /// While soft drop is held the per-frame gain ramps up linearly to the
    /// configured cap; releasing it drops the bonus back to zero.
    pub fn step(&mut self, level: u32, soft_drop: bool, config: &TimingConfig) -> bool {
        if soft_drop {
            self.soft_bonus = self
                .soft_bonus
                .saturating_add(config.soft_drop_ramp)
                .min(config.soft_drop_cap);
        } else {
            self.soft_bonus = 0;
        }

        self.accumulator = self
            .accumulator
            .saturating_add(GRAVITY_UNITS_PER_FRAME.saturating_add(self.soft_bonus));
        let threshold = frames_per_cell(level) * GRAVITY_UNITS_PER_FRAME;
        if self.accumulator < threshold {
            return false;
        }
        // One cell per frame at most.
        self.accumulator = (self.accumulator - threshold).min(threshold - 1);
        true
    }

    /// Restart the fall timer for a freshly spawned piece
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.soft_bonus = 0;
    }
}

/// Horizontal shift direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    /// Resolve held left/right inputs; both at once cancel out
    pub fn from_held(left: bool, right: bool) -> Option<Self> {
        match (left, right) {
            (true, false) => Some(Shift::Left),
            (false, true) => Some(Shift::Right),
            _ => None,
        }
    }

    pub fn dx(&self) -> i8 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Delayed auto shift state
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoShift {
    held: Option<Shift>,
    frames: u32,
}

impl AutoShift {
    /// Advance one frame with the currently held direction
    ///
    /// Returns a shift on the frame a direction is first pressed, then again
    /// once it has been held for the initial delay, then every repeat interval.
    pub fn step(&mut self, held: Option<Shift>, config: &TimingConfig) -> Option<Shift> {
        if held != self.held {
            self.held = held;
            self.frames = 0;
            return held;
        }

        let dir = held?;
        self.frames += 1;
        if self.frames >= config.das_initial_delay_frames {
            self.frames = config
                .das_initial_delay_frames
                .saturating_sub(config.das_repeat_rate_frames);
            return Some(dir);
        }
        None
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
