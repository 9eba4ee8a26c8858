//! Starfall - a vertical arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, effects)
//! - `config`: Immutable gameplay tunables
//! - `frame`: Frame delta clamping and FPS measurement
//! - `game_loop`: Dedicated simulation thread host
//! - `highscores`: Single-value highscore persistence

pub mod config;
pub mod error;
pub mod frame;
pub mod game_loop;
pub mod highscores;
pub mod sim;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use highscores::HighscoreStore;

/// Game-wide constants that are not tunables
pub mod consts {
    /// Maximum number of dead particles kept for reuse
    pub const PARTICLE_POOL_CAPACITY: usize = 200;

    /// Score for a meteor destroyed by a bullet or the shockwave
    pub const METEOR_SCORE: u32 = 1;
    /// Score for shooting the kraken
    pub const KRAKEN_SCORE: u32 = 50;

    /// Number of pre-sized meteor variants between min and max radius
    pub const METEOR_VARIANTS: usize = 12;

    /// Kraken hitbox is tighter than its visual radius
    pub const KRAKEN_HITBOX_SCALE: f32 = 0.8;
    /// Kraken diameter as a fraction of screen width (floored to 16 px)
    pub const KRAKEN_SIZE_FRACTION: f32 = 0.12;
    pub const KRAKEN_MIN_SIZE: f32 = 16.0;
    /// Kraken base horizontal speed as a fraction of screen width per second
    pub const KRAKEN_SPEED_FRACTION: f32 = 0.25;
    /// Vertical bob frequency (rad/s) and amplitude (fraction of radius)
    pub const KRAKEN_BOB_FREQUENCY: f32 = 5.0;
    pub const KRAKEN_BOB_AMPLITUDE: f32 = 0.5;

    /// Meteor speed cap, in screen heights per second
    pub const METEOR_MAX_SPEED: f32 = 1.5;

    /// Shake offset limit as a fraction of screen width at full intensity
    pub const SHAKE_OFFSET_FRACTION: f32 = 0.012;

    /// Raw frame deltas above this are treated as a stall
    pub const MAX_RAW_FRAME_DT: f32 = 0.05;

    /// Largest delta a single `Engine::update` will simulate
    pub const MAX_UPDATE_DT: f32 = 5.0;
}

/// Quadratic ease-out: fast start, slow finish
#[inline]
pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_endpoints() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert!((ease_out(0.5) - 0.75).abs() < 1e-6);
    }
}
