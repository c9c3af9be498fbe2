//! Engine configuration
//!
//! Every field has a classic default, so a config file only needs the values it
//! changes:
//!
//! ```
//! use classic_tetris_engine::{EngineConfig, Randomizer};
//!
//! let config = EngineConfig::from_json_str(r#"{ "randomizer": "bag", "start_level": 5 }"#).unwrap();
//! assert_eq!(config.randomizer, Randomizer::Bag);
//! assert_eq!(config.start_level, 5);
//! assert_eq!(config.timing.das_initial_delay_frames, 16);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Randomizer, RotationPolicy, ScoringConfig, TimingConfig};
use crate::types::{GRAVITY_TABLE, GRAVITY_UNITS_PER_FRAME, MAX_START_LEVEL};

/// Longest configurable delay, ten seconds of frames
const MAX_DELAY_FRAMES: u32 = 600;

/// Soft drop bonus ceiling: one level-0 cell per frame
const MAX_SOFT_DROP_UNITS: u32 = GRAVITY_UNITS_PER_FRAME * GRAVITY_TABLE[0];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub randomizer: Randomizer,
    pub rotation: RotationPolicy,
    pub start_level: u32,
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            scoring: ScoringConfig::default(),
            randomizer: Randomizer::Classic,
            rotation: RotationPolicy::Classic,
            start_level: 0,
            seed: 1,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.timing.das_initial_delay_frames == 0 {
            return invalid("timing.das_initial_delay_frames", "must be at least 1");
        }
        if self.timing.das_repeat_rate_frames == 0 {
            return invalid("timing.das_repeat_rate_frames", "must be at least 1");
        }
        if self.timing.das_repeat_rate_frames > self.timing.das_initial_delay_frames {
            return invalid(
                "timing.das_repeat_rate_frames",
                "must not exceed das_initial_delay_frames",
            );
        }
        if self.timing.are_rows_per_step == 0 {
            return invalid("timing.are_rows_per_step", "must be at least 1");
        }
        let delays = [
            ("timing.das_initial_delay_frames", self.timing.das_initial_delay_frames),
            ("timing.are_base_frames", self.timing.are_base_frames),
            ("timing.are_step_frames", self.timing.are_step_frames),
            ("timing.line_clear_flash_frames", self.timing.line_clear_flash_frames),
        ];
        if let Some((field, _)) = delays
            .into_iter()
            .find(|&(_, frames)| frames > MAX_DELAY_FRAMES)
        {
            return invalid(field, "must be 600 frames or fewer");
        }
        if self.timing.soft_drop_cap > MAX_SOFT_DROP_UNITS {
            return invalid("timing.soft_drop_cap", "must be 768 or lower");
        }
        if self.timing.soft_drop_ramp > self.timing.soft_drop_cap {
            return invalid("timing.soft_drop_ramp", "must not exceed soft_drop_cap");
        }
        if self.scoring.combo_max_window_ms == 0 {
            return invalid("scoring.combo_max_window_ms", "must be at least 1");
        }
        if self.scoring.combo_window_ms[1..].iter().any(|&ms| ms == 0) {
            return invalid("scoring.combo_window_ms", "clears must open a window");
        }
        if self.start_level > MAX_START_LEVEL {
            return invalid("start_level", "must be 29 or lower");
        }
        Ok(())
    }
}
