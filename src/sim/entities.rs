//! Game entities and their per-tick kinematics
//!
//! Entities are plain data owned by the engine. Each knows how to advance
//! itself and whether it has left the screen; nothing here touches the RNG.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal pixel position the ship steers toward
    pub target_x: f32,
}

impl Player {
    /// Spawn centered horizontally, one and a half ship heights above the bottom
    pub fn new(screen: Vec2, width: f32, height: f32) -> Self {
        let x = screen.x / 2.0;
        Self {
            pos: Vec2::new(x, screen.y - height * 1.5),
            width,
            height,
            target_x: x,
        }
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Y of the nose, where bullets leave the ship
    pub fn top(&self) -> f32 {
        self.pos.y - self.half_height()
    }

    /// Step toward the target at a bounded speed, then keep the hull on screen
    pub fn update(&mut self, dt: f32, follow_speed: f32, screen_width: f32) {
        let dx = self.target_x - self.pos.x;
        let max_step = follow_speed * dt * screen_width;
        if dx.abs() > max_step {
            self.pos.x += max_step.copysign(dx);
        } else {
            self.pos.x = self.target_x;
        }

        let half = self.half_width();
        self.pos.x = self.pos.x.clamp(half, (screen_width - half).max(half));
    }
}

/// A player shot travelling straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub radius: f32,
    /// Upward speed in pixels per second
    pub speed: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, radius: f32, speed: f32) -> Self {
        Self { pos, radius, speed }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y -= self.speed * dt;
    }

    /// Fully above the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }
}

/// A falling rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    pub pos: Vec2,
    pub radius: f32,
    /// Downward speed in pixels per second
    pub speed: f32,
    /// Index into the meteor size/appearance table
    pub variant: usize,
}

impl Meteor {
    pub fn new(pos: Vec2, radius: f32, speed: f32, variant: usize) -> Self {
        Self {
            pos,
            radius,
            speed,
            variant,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    /// Fully below the bottom edge
    pub fn is_off_screen(&self, screen_height: f32) -> bool {
        self.pos.y - self.radius > screen_height
    }
}

/// The serpentine enemy crossing the upper screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kraken {
    pub pos: Vec2,
    pub radius: f32,
    /// Signed horizontal speed (positive = moving right)
    pub speed_x: f32,
    /// Multiplier applied to the base speed at spawn; drives the audio pitch
    pub speed_factor: f32,
    start_y: f32,
    time_alive: f32,
}

impl Kraken {
    pub fn new(pos: Vec2, radius: f32, speed_x: f32, speed_factor: f32) -> Self {
        Self {
            pos,
            radius,
            speed_x,
            speed_factor,
            start_y: pos.y,
            time_alive: 0.0,
        }
    }

    /// Swim sideways while bobbing on a sine wave around the spawn height
    pub fn update(&mut self, dt: f32) {
        self.pos.x += self.speed_x * dt;
        self.time_alive += dt;
        let amplitude = self.radius * KRAKEN_BOB_AMPLITUDE;
        self.pos.y = self.start_y + (self.time_alive * KRAKEN_BOB_FREQUENCY).sin() * amplitude;
    }

    pub fn time_alive(&self) -> f32 {
        self.time_alive
    }

    /// Fully past the edge it is swimming toward
    pub fn is_off_screen(&self, screen_width: f32) -> bool {
        if self.speed_x > 0.0 {
            self.pos.x - self.radius > screen_width
        } else {
            self.pos.x + self.radius < 0.0
        }
    }
}

/// Packed 0xRRGGBB tint for a particle
pub type Tint = u32;

#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> Tint {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// A short-lived explosion spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before the particle dies
    pub life: f32,
    pub radius: f32,
    pub tint: Tint,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, radius: f32, tint: Tint) -> Self {
        Self {
            pos,
            vel,
            life,
            radius,
            tint,
        }
    }

    /// Reinitialise a recycled particle in place
    pub fn reset(&mut self, pos: Vec2, vel: Vec2, life: f32, radius: f32, tint: Tint) {
        self.pos = pos;
        self.vel = vel;
        self.life = life;
        self.radius = radius;
        self.tint = tint;
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life -= dt;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Fade-out opacity derived from remaining life
    pub fn alpha(&self) -> u8 {
        (self.life * 255.0).clamp(0.0, 255.0) as u8
    }
}
