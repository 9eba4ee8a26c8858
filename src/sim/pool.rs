//! Particle recycling
//!
//! Explosions arrive in bursts of 10-45 sparks that all die within a second.
//! Dead particles go onto a bounded LIFO free-list and are reset in place by
//! the next burst instead of being reallocated.

use glam::Vec2;

use super::entities::{Particle, Tint};
use crate::consts::PARTICLE_POOL_CAPACITY;

/// Running totals used to check the pool's bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Particles built from scratch because the free-list was empty
    pub created: u64,
    /// Particles taken back off the free-list
    pub reused: u64,
    /// Dead particles pushed onto the free-list
    pub recycled: u64,
    /// Dead particles dropped because the free-list was full
    pub discarded: u64,
}

impl PoolStats {
    /// Particles handed out and not yet returned
    pub fn outstanding(&self) -> u64 {
        (self.created + self.reused) - (self.recycled + self.discarded)
    }
}

/// Bounded free-list of dead particles
#[derive(Debug, Clone)]
pub struct ParticlePool {
    free: Vec<Particle>,
    capacity: usize,
    stats: PoolStats,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::new(PARTICLE_POOL_CAPACITY)
    }
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Take the most recently freed particle, or build a new one
    pub fn acquire(&mut self, pos: Vec2, vel: Vec2, life: f32, radius: f32, tint: Tint) -> Particle {
        match self.free.pop() {
            Some(mut p) => {
                p.reset(pos, vel, life, radius, tint);
                self.stats.reused += 1;
                p
            }
            None => {
                self.stats.created += 1;
                Particle::new(pos, vel, life, radius, tint)
            }
        }
    }

    /// Return a dead particle. Returns false if the pool was full and the
    /// particle was dropped.
    pub fn release(&mut self, particle: Particle) -> bool {
        if self.free.len() < self.capacity {
            self.free.push(particle);
            self.stats.recycled += 1;
            true
        } else {
            self.stats.discarded += 1;
            false
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

/// Advance live particles and hand the dead ones back to the pool.
///
/// Order of live particles is not gameplay-relevant, so removal is swap-remove.
pub fn update_particles(particles: &mut Vec<Particle>, pool: &mut ParticlePool, dt: f32) {
    let mut i = particles.len();
    while i > 0 {
        i -= 1;
        particles[i].update(dt);
        if particles[i].is_dead() {
            let dead = particles.swap_remove(i);
            pool.release(dead);
        }
    }
}
