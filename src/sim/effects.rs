//! Timed effects: the shockwave ability and screen shake

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use crate::config::GameConfig;
use crate::consts::SHAKE_OFFSET_FRACTION;
use crate::ease_out;

/// Cooldown progress published to the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CooldownReport {
    pub ready: bool,
    /// 0 right after triggering, 1 when ready again
    pub fraction: f32,
}

/// Ring geometry for one active tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockwaveRing {
    pub radius: f32,
    pub progress: f32,
}

/// What the shockwave did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShockwaveStep {
    /// Present while the cooldown was running at the start of the tick
    pub cooldown: Option<CooldownReport>,
    /// Present while the wave is expanding
    pub ring: Option<ShockwaveRing>,
}

/// Area-effect ability: idle -> active -> idle, with a cooldown that runs
/// independently of the active phase
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Shockwave {
    active: bool,
    timer: f32,
    cooldown_remaining: f32,
}

impl Shockwave {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    pub fn is_ready(&self) -> bool {
        !self.active && self.cooldown_remaining <= 0.0
    }

    /// Start the wave if it is off cooldown. Returns false when refused.
    pub fn trigger(&mut self, config: &GameConfig) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.active = true;
        self.timer = 0.0;
        self.cooldown_remaining = config.shockwave_cooldown_seconds;
        true
    }

    /// Current ring radius for drawing, if active
    pub fn ring(&self, config: &GameConfig, screen_width: f32) -> Option<ShockwaveRing> {
        if !self.active {
            return None;
        }
        let progress = (self.timer / config.shockwave_duration_seconds).clamp(0.0, 1.0);
        let max_radius = config.shockwave_max_radius_fraction * screen_width;
        Some(ShockwaveRing {
            radius: max_radius * ease_out(progress),
            progress,
        })
    }

    /// Run the cooldown and, if active, grow the ring. The wave switches off
    /// on the tick its timer reaches the duration; that tick's ring is still
    /// returned so it gets applied.
    pub fn advance(&mut self, dt: f32, config: &GameConfig, screen_width: f32) -> ShockwaveStep {
        let mut step = ShockwaveStep::default();

        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
            let total = config.shockwave_cooldown_seconds;
            let fraction = if total <= 0.0 {
                1.0
            } else {
                1.0 - (self.cooldown_remaining / total).clamp(0.0, 1.0)
            };
            step.cooldown = Some(CooldownReport {
                ready: self.cooldown_remaining <= 0.0,
                fraction,
            });
        }

        if self.active {
            self.timer += dt;
            step.ring = self.ring(config, screen_width);
            if self.timer >= config.shockwave_duration_seconds {
                self.active = false;
                self.timer = 0.0;
            }
        }

        step
    }
}

/// Damped random camera offset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenShake {
    intensity: f32,
    duration: f32,
    remaining: f32,
    offset: Vec2,
}

impl ScreenShake {
    /// Replace any running shake with a new impulse
    pub fn trigger(&mut self, intensity: f32, duration: f32) {
        self.intensity = intensity;
        self.duration = duration;
        self.remaining = duration;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Decay the shake and roll a new offset, scaled by how much is left
    pub fn update(&mut self, dt: f32, screen_width: f32, rng: &mut SimRng) {
        if self.remaining <= 0.0 {
            self.offset = Vec2::ZERO;
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        let progress = if self.duration > 0.0 {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let max_offset = screen_width * SHAKE_OFFSET_FRACTION * self.intensity * progress;
        self.offset = Vec2::new(
            (rng.random::<f32>() * 2.0 - 1.0) * max_offset,
            (rng.random::<f32>() * 2.0 - 1.0) * max_offset,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_trigger_is_gated_by_cooldown() {
        let config = GameConfig::default();
        let mut wave = Shockwave::default();
        assert!(wave.trigger(&config));
        assert!(!wave.trigger(&config));

        // Wave finishes but the cooldown keeps it locked
        wave.advance(1.0, &config, 400.0);
        assert!(!wave.is_active());
        assert!(!wave.trigger(&config));

        wave.advance(11.0, &config, 400.0);
        assert!(wave.trigger(&config));
    }

    #[test]
    fn test_cooldown_reports() {
        let config = GameConfig::default();
        let mut wave = Shockwave::default();
        assert_eq!(wave.advance(0.1, &config, 400.0).cooldown, None);

        wave.trigger(&config);
        let step = wave.advance(3.0, &config, 400.0);
        let report = step.cooldown.unwrap();
        assert!(!report.ready);
        assert!((report.fraction - 0.25).abs() < 1e-5);

        let step = wave.advance(20.0, &config, 400.0);
        assert_eq!(
            step.cooldown,
            Some(CooldownReport {
                ready: true,
                fraction: 1.0
            })
        );
        assert_eq!(wave.cooldown_remaining(), 0.0);
        assert_eq!(wave.advance(0.1, &config, 400.0).cooldown, None);
    }

    #[test]
    fn test_ring_eases_out_and_ends() {
        let config = GameConfig::default();
        let mut wave = Shockwave::default();
        wave.trigger(&config);

        let half = config.shockwave_duration_seconds / 2.0;
        let ring = wave.advance(half, &config, 400.0).ring.unwrap();
        assert!((ring.progress - 0.5).abs() < 1e-5);
        // 0.8 * 400 * 0.75
        assert!((ring.radius - 240.0).abs() < 1e-2);
        assert!(wave.is_active());

        let ring = wave.advance(half, &config, 400.0).ring.unwrap();
        assert!((ring.progress - 1.0).abs() < 1e-5);
        assert!(!wave.is_active());
        assert!(wave.advance(0.1, &config, 400.0).ring.is_none());
    }

    #[test]
    fn test_shake_decays_to_rest() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut shake = ScreenShake::default();
        shake.trigger(1.0, 0.3);

        shake.update(0.1, 1000.0, &mut rng);
        let limit = 1000.0 * SHAKE_OFFSET_FRACTION;
        assert!(shake.offset().x.abs() <= limit && shake.offset().y.abs() <= limit);

        shake.update(0.5, 1000.0, &mut rng);
        assert_eq!(shake.remaining(), 0.0);
        assert_eq!(shake.offset(), Vec2::ZERO);

        shake.update(0.1, 1000.0, &mut rng);
        assert_eq!(shake.offset(), Vec2::ZERO);
    }
}
