//! Tunable configuration.
//!
//! Every field defaults to the matching value in `constants`, so a JSON file
//! only needs to list what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Server-tunable shot parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub shot_speed: f32,
    pub shot_range: f32,
    pub gm_speed_factor: f32,
    pub gm_life_factor: f32,
    /// Maximum seeker turn rate (radians per second).
    pub gm_turn_rate: f32,
    pub gm_puff_time: f32,
    pub gm_activation_time: f32,
    pub muzzle_front: f32,
    pub shot_radius: f32,
    pub shot_tail_length: f32,
    pub link_fail_notice_window: f32,
    pub radar: RadarDisplay,
}

/// Radar display toggles (client preferences).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarDisplay {
    /// Tail length in `shot_tail_length` units; 0 draws no line.
    pub lined_shots: i32,
    /// Point size for the shot; 0 draws a single pixel.
    pub sized_shots: i32,
    /// Draw the line ahead of the shot instead of behind it.
    pub leading_line: bool,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            shot_speed: SHOT_SPEED,
            shot_range: SHOT_RANGE,
            gm_speed_factor: GM_SPEED_FACTOR,
            gm_life_factor: GM_LIFE_FACTOR,
            gm_turn_rate: GM_TURN_RATE,
            gm_puff_time: GM_PUFF_TIME,
            gm_activation_time: GM_ACTIVATION_TIME,
            muzzle_front: MUZZLE_FRONT,
            shot_radius: SHOT_RADIUS,
            shot_tail_length: SHOT_TAIL_LENGTH,
            link_fail_notice_window: LINK_FAIL_NOTICE_WINDOW,
            radar: RadarDisplay::default(),
        }
    }
}

impl Default for RadarDisplay {
    fn default() -> Self {
        Self {
            lined_shots: 0,
            sized_shots: 2,
            leading_line: false,
        }
    }
}

impl Tunables {
    /// Guided missile cruise speed.
    pub fn missile_speed(&self) -> f32 {
        self.shot_speed * self.gm_speed_factor
    }

    /// Lifetime of an ordinary shot, before the guided missile multiplier.
    pub fn base_shot_lifetime(&self) -> f32 {
        self.shot_range / self.shot_speed
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
