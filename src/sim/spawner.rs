//! Spawn cadences and difficulty ramp
//!
//! Every recurring spawn is an accumulator: time is added each tick and
//! whole intervals are consumed, carrying the remainder over.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::entities::{Bullet, Kraken, Meteor, Player};
use crate::config::GameConfig;
use crate::consts::*;

/// Accumulator that fires once per elapsed interval
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cadence {
    timer: f32,
}

impl Cadence {
    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
    }

    /// Consume every whole interval that has elapsed (catch-up after a long
    /// frame). Returns how many triggers are due.
    pub fn drain(&mut self, interval: f32) -> u32 {
        if self.timer < interval {
            return 0;
        }
        let due = (self.timer / interval).floor();
        // `%` is exact, so the carry stays below one interval at any magnitude
        self.timer %= interval;
        due as u32
    }

    /// Consume at most one interval
    pub fn take_one(&mut self, interval: f32) -> bool {
        if self.timer >= interval {
            self.timer -= interval;
            true
        } else {
            false
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }
}

/// Pixel radii of the meteor variants, smallest first
#[derive(Debug, Clone, Default)]
pub struct MeteorSizes {
    radii: Vec<f32>,
}

impl MeteorSizes {
    pub fn new(config: &GameConfig, screen_width: f32) -> Self {
        let min = config.meteor_min_radius_fraction * screen_width;
        let max = config.meteor_max_radius_fraction * screen_width;
        let steps = (METEOR_VARIANTS - 1).max(1) as f32;
        let radii = (0..METEOR_VARIANTS)
            .map(|i| min + (max - min) * (i as f32 / steps))
            .collect();
        Self { radii }
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn radius(&self, variant: usize) -> f32 {
        self.radii[variant]
    }
}

/// Kraken radius for a given screen width
pub fn kraken_radius(screen_width: f32) -> f32 {
    (screen_width * KRAKEN_SIZE_FRACTION).floor().max(KRAKEN_MIN_SIZE) / 2.0
}

/// Seconds before the first kraken of a session
pub fn first_kraken_delay(rng: &mut SimRng) -> f32 {
    5.0 + rng.random::<f32>() * 8.0
}

/// Seconds between a kraken spawning and the next one becoming eligible
pub fn next_kraken_delay(rng: &mut SimRng) -> f32 {
    8.0 + rng.random::<f32>() * 12.0
}

/// All spawn timers for one session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds since the session started; drives the difficulty ramp
    elapsed: f32,
    fire: Cadence,
    meteor: Cadence,
    /// Countdown to the next kraken; only runs while none is alive
    kraken_delay: f32,
}

impl Spawner {
    pub fn new(rng: &mut SimRng) -> Self {
        Self {
            kraken_delay: first_kraken_delay(rng),
            ..Default::default()
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn kraken_delay(&self) -> f32 {
        self.kraken_delay
    }

    /// Add a tick's worth of time to the session clock and the cadences
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.fire.advance(dt);
        self.meteor.advance(dt);
    }

    /// Number of bullets owed since the last tick
    pub fn due_shots(&mut self, config: &GameConfig) -> u32 {
        self.fire.drain(config.fire_interval_seconds)
    }

    /// Current meteor spawn interval (shrinks linearly, floored)
    pub fn meteor_interval(&self, config: &GameConfig) -> f32 {
        let reduction = self.elapsed * config.spawn_acceleration_per_second;
        (config.spawn_base_interval_seconds - reduction).max(config.spawn_min_interval_seconds)
    }

    /// At most one meteor per tick
    pub fn meteor_due(&mut self, config: &GameConfig) -> bool {
        let interval = self.meteor_interval(config);
        self.meteor.take_one(interval)
    }

    /// Current meteor fall speed in pixels per second (ramps up, capped)
    pub fn meteor_speed(&self, config: &GameConfig, screen_height: f32) -> f32 {
        let fraction =
            config.meteor_base_speed_per_second + self.elapsed * config.meteor_speed_ramp_per_second;
        fraction.min(METEOR_MAX_SPEED) * screen_height
    }

    /// Count down toward the next kraken. Returns true when one should spawn;
    /// the following delay is armed immediately.
    pub fn kraken_due(&mut self, dt: f32, kraken_alive: bool, rng: &mut SimRng) -> bool {
        if kraken_alive {
            return false;
        }
        self.kraken_delay -= dt;
        if self.kraken_delay <= 0.0 {
            self.kraken_delay = next_kraken_delay(rng);
            true
        } else {
            false
        }
    }
}

/// A bullet leaving the player's nose
pub fn spawn_bullet(player: &Player, config: &GameConfig, screen: Vec2) -> Bullet {
    let radius = screen.x * config.bullet_radius_fraction;
    let speed = config.bullet_speed_per_second * screen.y;
    Bullet::new(Vec2::new(player.pos.x, player.top() - radius), radius, speed)
}

/// A meteor just above the top edge at a random column
pub fn spawn_meteor(rng: &mut SimRng, sizes: &MeteorSizes, speed: f32, screen: Vec2) -> Meteor {
    let variant = rng.random_range(0..sizes.len());
    let radius = sizes.radius(variant);
    let x = rng.random::<f32>() * (screen.x - 2.0 * radius) + radius;
    Meteor::new(Vec2::new(x, -radius), radius, speed, variant)
}

/// A kraken entering from a random side, off screen by one diameter
pub fn spawn_kraken(rng: &mut SimRng, screen: Vec2) -> Kraken {
    let radius = kraken_radius(screen.x);
    let from_left = rng.random_bool(0.5);
    let x = if from_left {
        -radius * 2.0
    } else {
        screen.x + radius * 2.0
    };
    let y = screen.y * (0.1 + rng.random::<f32>() * 0.3);

    let speed_factor = 0.7 + rng.random::<f32>() * 0.9;
    let direction = if from_left { 1.0 } else { -1.0 };
    let speed = screen.x * KRAKEN_SPEED_FRACTION * speed_factor * direction;

    Kraken::new(Vec2::new(x, y), radius, speed, speed_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cadence_catches_up() {
        let mut cadence = Cadence::default();
        cadence.advance(1.0);
        assert_eq!(cadence.drain(0.18), 5);
        assert!(cadence.timer() < 0.18);
        assert!(cadence.timer() > 0.0);
    }

    #[test]
    fn test_cadence_drains_huge_backlog_at_once() {
        let mut cadence = Cadence::default();
        cadence.advance(1.0e8);
        let due = cadence.drain(0.18);
        assert!(due > 500_000_000);
        assert!(cadence.timer() >= 0.0 && cadence.timer() < 0.18);
        assert_eq!(cadence.drain(0.18), 0);
    }

    #[test]
    fn test_cadence_take_one_keeps_remainder() {
        let mut cadence = Cadence::default();
        cadence.advance(2.0);
        assert!(cadence.take_one(0.8));
        assert!((cadence.timer() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_meteor_interval_ramps_to_floor() {
        let config = GameConfig::default();
        let mut spawner = Spawner::default();
        assert!((spawner.meteor_interval(&config) - 0.8).abs() < 1e-6);
        spawner.advance(10.0);
        assert!((spawner.meteor_interval(&config) - 0.5).abs() < 1e-5);
        spawner.advance(100.0);
        assert_eq!(spawner.meteor_interval(&config), 0.25);
    }

    #[test]
    fn test_meteor_speed_capped() {
        let config = GameConfig::default();
        let mut spawner = Spawner::default();
        let start = spawner.meteor_speed(&config, 1000.0);
        assert!((start - 180.0).abs() < 1e-3);
        spawner.advance(1000.0);
        assert_eq!(spawner.meteor_speed(&config, 1000.0), 1500.0);
    }

    #[test]
    fn test_kraken_waits_while_alive() {
        let mut rng = SimRng::seed_from_u64(7);
        let mut spawner = Spawner::new(&mut rng);
        let delay = spawner.kraken_delay();
        assert!((5.0..13.0).contains(&delay));

        assert!(!spawner.kraken_due(100.0, true, &mut rng));
        assert_eq!(spawner.kraken_delay(), delay);

        assert!(spawner.kraken_due(delay, false, &mut rng));
        assert!((8.0..20.0).contains(&spawner.kraken_delay()));
    }

    #[test]
    fn test_spawned_meteor_within_columns() {
        let mut rng = SimRng::seed_from_u64(3);
        let config = GameConfig::default();
        let screen = Vec2::new(400.0, 800.0);
        let sizes = MeteorSizes::new(&config, screen.x);
        assert_eq!(sizes.len(), METEOR_VARIANTS);
        assert!((sizes.radius(0) - 12.0).abs() < 1e-4);
        assert!((sizes.radius(METEOR_VARIANTS - 1) - 32.0).abs() < 1e-4);

        for _ in 0..200 {
            let m = spawn_meteor(&mut rng, &sizes, 100.0, screen);
            assert!(m.pos.x >= m.radius && m.pos.x <= screen.x - m.radius);
            assert_eq!(m.pos.y, -m.radius);
        }
    }

    #[test]
    fn test_spawned_kraken_heads_inward() {
        let mut rng = SimRng::seed_from_u64(11);
        let screen = Vec2::new(400.0, 800.0);
        for _ in 0..50 {
            let k = spawn_kraken(&mut rng, screen);
            assert_eq!(k.radius, 24.0);
            assert!((0.7..1.6).contains(&k.speed_factor));
            assert!(k.pos.y >= 80.0 && k.pos.y < 320.0);
            if k.pos.x < 0.0 {
                assert!(k.speed_x > 0.0);
            } else {
                assert!(k.speed_x < 0.0);
            }
            assert!(!k.is_off_screen(screen.x));
        }
    }

    #[test]
    fn test_bullet_leaves_the_nose() {
        let config = GameConfig::default();
        let screen = Vec2::new(400.0, 800.0);
        let player = Player::new(screen, 48.0, 48.0);
        let bullet = spawn_bullet(&player, &config, screen);
        assert!((bullet.radius - 4.0).abs() < 1e-4);
        assert_eq!(bullet.pos.x, player.pos.x);
        assert!((bullet.pos.y - (player.top() - 4.0)).abs() < 1e-3);
        assert!((bullet.speed - 720.0).abs() < 1e-3);
    }
}
