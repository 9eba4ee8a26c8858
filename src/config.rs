//! Gameplay tunables
//!
//! One immutable record, built once (defaults or JSON) and passed by
//! reference. Speeds and sizes are fractions of the screen so the same
//! config works at any resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Frame rate the host loop aims for
    pub target_fps: u32,

    // === Player ===
    /// Ship width as a fraction of screen width
    pub player_width_fraction: f32,
    /// Ship height as a fraction of screen height
    pub player_height_fraction: f32,
    /// Screen widths per second the ship moves toward its target
    pub player_follow_speed: f32,

    // === Bullets ===
    /// Screen heights per second
    pub bullet_speed_per_second: f32,
    pub bullet_radius_fraction: f32,
    pub fire_interval_seconds: f32,

    // === Meteors ===
    pub meteor_min_radius_fraction: f32,
    pub meteor_max_radius_fraction: f32,
    /// Screen heights per second at session start
    pub meteor_base_speed_per_second: f32,
    /// Added to the base speed per elapsed second
    pub meteor_speed_ramp_per_second: f32,
    pub spawn_base_interval_seconds: f32,
    pub spawn_min_interval_seconds: f32,
    /// Subtracted from the spawn interval per elapsed second
    pub spawn_acceleration_per_second: f32,

    // === Shockwave ===
    pub shockwave_cooldown_seconds: f32,
    pub shockwave_duration_seconds: f32,
    /// Final ring radius as a fraction of screen width
    pub shockwave_max_radius_fraction: f32,
    /// Meteors at or below this radius (fraction of width) are destroyed
    pub shockwave_destroy_radius_fraction: f32,
    /// Push speed in screen heights per second at the start of the wave
    pub shockwave_push_per_second: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,

            player_width_fraction: 0.12,
            player_height_fraction: 0.06,
            player_follow_speed: 8.0,

            bullet_speed_per_second: 0.9,
            bullet_radius_fraction: 0.01,
            fire_interval_seconds: 0.18,

            meteor_min_radius_fraction: 0.03,
            meteor_max_radius_fraction: 0.08,
            meteor_base_speed_per_second: 0.18,
            meteor_speed_ramp_per_second: 0.02,
            spawn_base_interval_seconds: 0.8,
            spawn_min_interval_seconds: 0.25,
            spawn_acceleration_per_second: 0.03,

            shockwave_cooldown_seconds: 12.0,
            shockwave_duration_seconds: 0.65,
            shockwave_max_radius_fraction: 0.8,
            shockwave_destroy_radius_fraction: 0.045,
            shockwave_push_per_second: 0.6,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json(&json)?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Reject values that would stall a cadence or divide by zero
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(invalid("target_fps", "must be at least 1"));
        }

        let positive = [
            ("player_width_fraction", self.player_width_fraction),
            ("player_height_fraction", self.player_height_fraction),
            ("bullet_radius_fraction", self.bullet_radius_fraction),
            ("bullet_speed_per_second", self.bullet_speed_per_second),
            ("fire_interval_seconds", self.fire_interval_seconds),
            ("meteor_min_radius_fraction", self.meteor_min_radius_fraction),
            ("meteor_max_radius_fraction", self.meteor_max_radius_fraction),
            ("spawn_min_interval_seconds", self.spawn_min_interval_seconds),
            ("spawn_base_interval_seconds", self.spawn_base_interval_seconds),
            ("shockwave_duration_seconds", self.shockwave_duration_seconds),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be > 0, got {value}")));
            }
        }

        let non_negative = [
            ("player_follow_speed", self.player_follow_speed),
            ("meteor_base_speed_per_second", self.meteor_base_speed_per_second),
            ("meteor_speed_ramp_per_second", self.meteor_speed_ramp_per_second),
            ("spawn_acceleration_per_second", self.spawn_acceleration_per_second),
            ("shockwave_cooldown_seconds", self.shockwave_cooldown_seconds),
            ("shockwave_max_radius_fraction", self.shockwave_max_radius_fraction),
            ("shockwave_destroy_radius_fraction", self.shockwave_destroy_radius_fraction),
            ("shockwave_push_per_second", self.shockwave_push_per_second),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be >= 0, got {value}")));
            }
        }

        if self.meteor_max_radius_fraction < self.meteor_min_radius_fraction {
            return Err(invalid(
                "meteor_max_radius_fraction",
                "must not be smaller than meteor_min_radius_fraction",
            ));
        }

        Ok(())
    }

    /// Seconds per frame at the target rate
    pub fn target_frame_time(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Largest delta handed to the simulation in one tick
    pub fn max_tick_dt(&self) -> f32 {
        self.target_frame_time() * 2.0
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
