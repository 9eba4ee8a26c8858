//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order)
//! - No rendering, audio or platform dependencies

pub mod background;
pub mod collision;
pub mod draw;
pub mod effects;
pub mod engine;
pub mod entities;
pub mod events;
pub mod input;
pub mod pool;
pub mod spawner;

/// The simulation's random source
pub type SimRng = rand_pcg::Pcg32;

pub use draw::{Canvas, DrawCommand, DrawList};
pub use effects::{ScreenShake, Shockwave};
pub use engine::{Engine, ExplosionKind, GamePhase, SessionStats};
pub use entities::{Bullet, Kraken, Meteor, Particle, Player};
pub use events::{EventSink, GameEvent, GameEventListener, ListenerSink, SoundCue};
pub use input::InputHandle;
pub use pool::{ParticlePool, PoolStats};
