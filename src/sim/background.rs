//! Decorative backdrop: drifting stars and two static planets
//!
//! Purely cosmetic. It has its own RNG stream so that resizing or star
//! wrap-arounds never shift the gameplay random sequence.

use glam::Vec2;
use rand::{Rng, SeedableRng};

use super::SimRng;

const STAR_COUNT: usize = 120;
const PLANET_COUNT: usize = 2;
/// Base star drift in screen heights per second
const STAR_DRIFT: f32 = 0.08;

/// Planet base colours (blue, violet)
const PLANET_COLORS: [[f32; 4]; PLANET_COUNT] = [
    [0.18, 0.553, 0.847, 1.0],
    [0.659, 0.333, 0.969, 1.0],
];

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Parallax factor applied to the base drift
    pub speed_multiplier: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct Background {
    pub stars: Vec<Star>,
    pub planets: Vec<Planet>,
    rng: SimRng,
}

impl Background {
    pub fn new(seed: u64) -> Self {
        Self {
            stars: Vec::new(),
            planets: Vec::new(),
            rng: SimRng::seed_from_u64(seed),
        }
    }

    /// Scatter a fresh sky over the given screen
    pub fn populate(&mut self, screen: Vec2) {
        self.stars.clear();
        self.planets.clear();
        if screen.x <= 0.0 || screen.y <= 0.0 {
            return;
        }

        let rng = &mut self.rng;
        for _ in 0..STAR_COUNT {
            self.stars.push(Star {
                pos: Vec2::new(rng.random::<f32>() * screen.x, rng.random::<f32>() * screen.y),
                radius: screen.x * (0.0015 + rng.random::<f32>() * 0.0025),
                speed_multiplier: 0.25 + rng.random::<f32>() * 0.8,
                alpha: (160 + rng.random_range(0..95)).min(255) as f32 / 255.0,
            });
        }

        for (index, color) in PLANET_COLORS.iter().enumerate() {
            let radius = screen.x * (0.08 + rng.random::<f32>() * 0.12);
            let x = screen.x * (0.2 + rng.random::<f32>() * 0.6);
            let y = screen.y * (0.2 + rng.random::<f32>() * 0.4) + index as f32 * screen.y * 0.1;
            self.planets.push(Planet {
                pos: Vec2::new(x, y),
                radius,
                color: *color,
            });
        }
    }

    /// Drift stars downward, wrapping them to a new column at the top
    pub fn update(&mut self, dt: f32, screen: Vec2) {
        if self.stars.is_empty() || screen.y <= 0.0 {
            return;
        }
        let base_speed = screen.y * STAR_DRIFT;
        for star in &mut self.stars {
            star.pos.y += base_speed * star.speed_multiplier * dt;
            if star.pos.y > screen.y {
                star.pos.y = -star.radius;
                star.pos.x = self.rng.random::<f32>() * screen.x;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_and_wrap() {
        let screen = Vec2::new(400.0, 800.0);
        let mut sky = Background::new(5);
        sky.populate(screen);
        assert_eq!(sky.stars.len(), STAR_COUNT);
        assert_eq!(sky.planets.len(), PLANET_COUNT);

        // Long enough for every star to cross the screen at least once
        for _ in 0..100 {
            sky.update(0.5, screen);
        }
        for star in &sky.stars {
            assert!(star.pos.y <= screen.y);
            assert!(star.pos.x >= 0.0 && star.pos.x <= screen.x);
        }
    }

    #[test]
    fn test_empty_screen_has_no_sky() {
        let mut sky = Background::new(5);
        sky.populate(Vec2::ZERO);
        assert!(sky.stars.is_empty());
        sky.update(1.0, Vec2::ZERO);
    }
}
