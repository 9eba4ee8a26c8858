//! Simulation orchestrator
//!
//! Owns every entity collection and controller and advances them in a fixed
//! order each tick. Events and sound cues are queued for the host to drain.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::background::Background;
use super::collision::{BulletHit, ShockwavePulse, apply_shockwave, first_player_hit, resolve_bullet_hits};
use super::draw::{self, Canvas};
use super::effects::{ScreenShake, Shockwave};
use super::entities::{Bullet, Kraken, Meteor, Particle, Player, rgb};
use super::events::{EventSink, GameEvent, SoundCue};
use super::input::InputHandle;
use super::pool::{ParticlePool, update_particles};
use super::spawner::{self, MeteorSizes, Spawner};
use crate::config::GameConfig;
use crate::consts::*;

/// Stream offset so the backdrop never shares the gameplay sequence
const BACKGROUND_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started, or paused by the host
    #[default]
    Waiting,
    /// Active gameplay
    Running,
    /// A meteor reached the ship
    GameOver,
}

/// Which explosion look to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionKind {
    /// 10-18 orange/red sparks
    Meteor,
    /// 30-45 faster green sparks
    Kraken,
}

/// Per-session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub bullets_fired: u64,
    pub meteors_spawned: u64,
    pub meteors_destroyed: u64,
    pub krakens_spawned: u64,
    pub krakens_destroyed: u64,
}

pub struct Engine {
    config: GameConfig,
    rng: SimRng,
    screen: Vec2,
    phase: GamePhase,

    player: Option<Player>,
    bullets: Vec<Bullet>,
    meteors: Vec<Meteor>,
    kraken: Option<Kraken>,
    particles: Vec<Particle>,
    pool: ParticlePool,

    spawner: Spawner,
    meteor_sizes: MeteorSizes,
    shockwave: Shockwave,
    shake: ScreenShake,
    background: Background,

    score: u32,
    highscore: u32,
    stats: SessionStats,

    events: Vec<GameEvent>,
    sound_cues: Vec<SoundCue>,
}

impl Engine {
    /// Engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Engine with a fixed seed; same seed and inputs give the same run
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = SimRng::seed_from_u64(seed);
        let spawner = Spawner::new(&mut rng);
        Self {
            config,
            rng,
            screen: Vec2::ZERO,
            phase: GamePhase::Waiting,
            player: None,
            bullets: Vec::new(),
            meteors: Vec::new(),
            kraken: None,
            particles: Vec::new(),
            pool: ParticlePool::default(),
            spawner,
            meteor_sizes: MeteorSizes::default(),
            shockwave: Shockwave::default(),
            shake: ScreenShake::default(),
            background: Background::new(seed ^ BACKGROUND_STREAM),
            score: 0,
            highscore: 0,
            stats: SessionStats::default(),
            events: Vec::new(),
            sound_cues: Vec::new(),
        }
    }

    // === Host-facing controls ===

    /// Set the screen size and re-derive every screen-relative size.
    /// Zero dimensions leave the engine uninitialised.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.screen = Vec2::new(width as f32, height as f32);
        if !self.has_screen() {
            self.player = None;
            return;
        }

        log::info!("Resized to {}x{}", width, height);
        self.meteor_sizes = MeteorSizes::new(&self.config, self.screen.x);
        self.background.populate(self.screen);
        self.player = Some(self.new_player());
    }

    /// Start or restart a session
    pub fn reset(&mut self) {
        if !self.has_screen() {
            log::warn!("reset() before resize(), ignoring");
            return;
        }

        self.bullets.clear();
        self.meteors.clear();
        for particle in self.particles.drain(..) {
            self.pool.release(particle);
        }
        if self.kraken.take().is_some() {
            self.sound_cues.push(SoundCue::KrakenLoopStop);
        }

        self.background.populate(self.screen);
        self.spawner = Spawner::new(&mut self.rng);
        self.shockwave = Shockwave::default();
        self.shake = ScreenShake::default();
        self.player = Some(self.new_player());
        self.score = 0;
        self.stats = SessionStats::default();
        self.phase = GamePhase::Running;

        log::info!(
            "Session started (first kraken in {:.1}s)",
            self.spawner.kraken_delay()
        );
        self.events.push(GameEvent::ScoreChanged(0));
        self.events.push(GameEvent::ShockwaveState {
            ready: true,
            cooldown_fraction: 1.0,
        });
    }

    /// Steer the ship toward an absolute x
    pub fn set_player_target(&mut self, x: f32) {
        if !x.is_finite() {
            return;
        }
        if let Some(player) = self.player.as_mut() {
            player.target_x = x;
        }
    }

    /// Fire the shockwave if the session is running and it is off cooldown.
    /// Returns whether it went off.
    pub fn activate_shockwave(&mut self) -> bool {
        if self.player.is_none() || self.phase != GamePhase::Running {
            return false;
        }
        if !self.shockwave.trigger(&self.config) {
            log::debug!(
                "Shockwave refused ({:.2}s cooldown left)",
                self.shockwave.cooldown_remaining()
            );
            return false;
        }

        log::info!("Shockwave!");
        self.sound_cues.push(SoundCue::Explosion);
        self.events.push(GameEvent::ShockwaveState {
            ready: false,
            cooldown_fraction: 0.0,
        });
        true
    }

    /// Pull the latest input written by the UI thread
    pub fn apply_input(&mut self, input: &InputHandle) {
        if let Some(x) = input.target_x() {
            self.set_player_target(x);
        }
        if input.take_shockwave_request() {
            self.activate_shockwave();
        }
    }

    /// Host paused the game
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Waiting;
        }
    }

    /// Drawing surface went away; pause and silence the kraken
    pub fn on_surface_lost(&mut self) {
        self.pause();
        if self.kraken.is_some() {
            self.sound_cues.push(SoundCue::KrakenLoopStop);
        }
    }

    /// Best score known to the persistence layer
    pub fn set_highscore(&mut self, value: u32) {
        self.highscore = value;
    }

    // === Tick ===

    /// Advance the simulation. No-op unless a session is running.
    pub fn update(&mut self, dt: f32) {
        if self.phase != GamePhase::Running || self.player.is_none() {
            return;
        }
        let dt = if !dt.is_finite() || dt < 0.0 {
            log::warn!("Invalid frame delta {dt}, treating as 0");
            0.0
        } else if dt > MAX_UPDATE_DT {
            log::warn!("Frame delta {dt} too large, simulating {MAX_UPDATE_DT}s");
            MAX_UPDATE_DT
        } else {
            dt
        };

        self.spawner.advance(dt);
        self.background.update(dt, self.screen);
        self.update_shockwave(dt);

        self.fire();
        self.maybe_spawn_meteor();
        self.maybe_spawn_kraken(dt);

        self.update_bullets(dt);
        self.update_meteors(dt);
        self.update_kraken(dt);
        update_particles(&mut self.particles, &mut self.pool, dt);
        if let Some(player) = self.player.as_mut() {
            player.update(dt, self.config.player_follow_speed, self.screen.x);
        }
        self.shake.update(dt, self.screen.x, &mut self.rng);

        self.detect_collisions();
    }

    fn update_shockwave(&mut self, dt: f32) {
        let step = self.shockwave.advance(dt, &self.config, self.screen.x);
        if let Some(report) = step.cooldown {
            self.events.push(GameEvent::ShockwaveState {
                ready: report.ready,
                cooldown_fraction: report.fraction,
            });
        }

        let (Some(ring), Some(player)) = (step.ring, self.player.as_ref()) else {
            return;
        };
        let pulse = ShockwavePulse {
            center: player.pos,
            radius: ring.radius,
            progress: ring.progress,
        };
        let destroy_threshold = self.screen.x * self.config.shockwave_destroy_radius_fraction;
        let push_speed = self.screen.y * self.config.shockwave_push_per_second;

        let destroyed = apply_shockwave(&mut self.meteors, &pulse, destroy_threshold, push_speed, dt);
        for (pos, radius) in destroyed {
            self.stats.meteors_destroyed += 1;
            self.add_score(METEOR_SCORE);
            self.spawn_explosion(pos, radius, ExplosionKind::Meteor);
        }
    }

    fn fire(&mut self) {
        let due = self.spawner.due_shots(&self.config);
        let Some(player) = self.player.as_ref() else {
            return;
        };
        for _ in 0..due {
            self.bullets
                .push(spawner::spawn_bullet(player, &self.config, self.screen));
            self.sound_cues.push(SoundCue::Laser);
        }
        self.stats.bullets_fired += due as u64;
    }

    fn maybe_spawn_meteor(&mut self) {
        if !self.spawner.meteor_due(&self.config) {
            return;
        }
        let speed = self.spawner.meteor_speed(&self.config, self.screen.y);
        let meteor = spawner::spawn_meteor(&mut self.rng, &self.meteor_sizes, speed, self.screen);
        self.meteors.push(meteor);
        self.stats.meteors_spawned += 1;
    }

    fn maybe_spawn_kraken(&mut self, dt: f32) {
        if !self
            .spawner
            .kraken_due(dt, self.kraken.is_some(), &mut self.rng)
        {
            return;
        }
        let kraken = spawner::spawn_kraken(&mut self.rng, self.screen);
        log::debug!(
            "Kraken spawned at ({:.0}, {:.0}), speed factor {:.2}",
            kraken.pos.x,
            kraken.pos.y,
            kraken.speed_factor
        );
        self.sound_cues.push(SoundCue::KrakenLoopStart {
            speed_factor: kraken.speed_factor,
        });
        self.kraken = Some(kraken);
        self.stats.krakens_spawned += 1;
    }

    fn update_bullets(&mut self, dt: f32) {
        self.bullets.retain_mut(|bullet| {
            bullet.update(dt);
            !bullet.is_off_screen()
        });
    }

    fn update_meteors(&mut self, dt: f32) {
        let height = self.screen.y;
        self.meteors.retain_mut(|meteor| {
            meteor.update(dt);
            !meteor.is_off_screen(height)
        });
    }

    fn update_kraken(&mut self, dt: f32) {
        let Some(kraken) = self.kraken.as_mut() else {
            return;
        };
        kraken.update(dt);
        if kraken.is_off_screen(self.screen.x) {
            log::debug!("Kraken left the screen");
            self.kraken = None;
            self.sound_cues.push(SoundCue::KrakenLoopStop);
        }
    }

    fn detect_collisions(&mut self) {
        let hits = resolve_bullet_hits(&mut self.bullets, &mut self.meteors, &mut self.kraken);
        for hit in hits {
            match hit {
                BulletHit::Kraken { pos, radius } => {
                    self.stats.krakens_destroyed += 1;
                    self.add_score(KRAKEN_SCORE);
                    self.spawn_explosion(pos, radius, ExplosionKind::Kraken);
                    self.shake.trigger(0.8, 0.25);
                    self.sound_cues.push(SoundCue::KrakenLoopStop);
                    self.sound_cues.push(SoundCue::KrakenExplosion);
                }
                BulletHit::Meteor { pos, radius } => {
                    self.stats.meteors_destroyed += 1;
                    self.add_score(METEOR_SCORE);
                    self.spawn_explosion(pos, radius, ExplosionKind::Meteor);
                    self.shake.trigger(0.5, 0.18);
                    self.sound_cues.push(SoundCue::Explosion);
                }
            }
        }

        if self.phase != GamePhase::Running {
            return;
        }
        let Some(player) = self.player.as_ref() else {
            return;
        };
        if first_player_hit(player, &self.meteors).is_none() {
            return;
        }

        self.phase = GamePhase::GameOver;
        self.shake.trigger(1.2, 0.3);
        if self.kraken.is_some() {
            self.sound_cues.push(SoundCue::KrakenLoopStop);
        }
        let new_best = self.score > self.highscore;
        self.sound_cues.push(if new_best {
            SoundCue::Highscore
        } else {
            SoundCue::GameOver
        });
        log::info!(
            "Game over: score {} (best {}), {:.1}s survived",
            self.score,
            self.highscore,
            self.spawner.elapsed()
        );
        self.events.push(GameEvent::GameOver(self.score));
    }

    fn add_score(&mut self, points: u32) {
        self.score += points;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    /// Burst of sparks, reusing pooled particles where possible
    pub fn spawn_explosion(&mut self, pos: Vec2, object_radius: f32, kind: ExplosionKind) {
        let is_kraken = kind == ExplosionKind::Kraken;
        let count = if is_kraken {
            self.rng.random_range(30..45)
        } else {
            self.rng.random_range(10..18)
        };
        let speed_scale = if is_kraken { 1.5 } else { 1.0 };
        let radius = object_radius * 0.15;

        for _ in 0..count {
            let angle = self.rng.random::<f32>() * TAU;
            let speed = self.screen.x * 0.3 * (0.5 + self.rng.random::<f32>()) * speed_scale;
            let life = 0.3 + self.rng.random::<f32>() * 0.35;
            let tint = if is_kraken {
                rgb(self.rng.random_range(100..200), 255, self.rng.random_range(100..200))
            } else {
                rgb(255, self.rng.random_range(80..180), self.rng.random_range(40..120))
            };

            let particle = self
                .pool
                .acquire(pos, Vec2::from_angle(angle) * speed, life, radius, tint);
            self.particles.push(particle);
        }
    }

    // === Output ===

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forward queued events to a sink, in order
    pub fn flush_events<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.events.drain(..) {
            sink.emit(event);
        }
    }

    /// Take all sound cues queued since the last drain
    pub fn drain_sound_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sound_cues)
    }

    /// Describe the current frame
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear(draw::BACKGROUND);
        for planet in &self.background.planets {
            canvas.fill_circle(planet.pos, planet.radius, planet.color);
        }
        for star in &self.background.stars {
            canvas.fill_circle(star.pos, star.radius, [1.0, 1.0, 1.0, star.alpha]);
        }

        let Some(player) = self.player.as_ref() else {
            return;
        };
        let offset = self.shake.offset();

        if let Some(ring) = self.shockwave.ring(&self.config, self.screen.x) {
            let width = self.screen.x * 0.01 * (1.0 - ring.progress) + 1.0;
            canvas.stroke_circle(player.pos + offset, ring.radius, width, draw::SHOCKWAVE);
        }
        for meteor in &self.meteors {
            canvas.fill_circle(meteor.pos + offset, meteor.radius, draw::METEOR);
        }
        for bullet in &self.bullets {
            canvas.fill_circle(bullet.pos + offset, bullet.radius, draw::BULLET);
        }
        for particle in &self.particles {
            let color = draw::tint_color(particle.tint, particle.alpha());
            canvas.fill_circle(particle.pos + offset, particle.radius, color);
        }
        if let Some(kraken) = self.kraken.as_ref() {
            canvas.fill_circle(kraken.pos + offset, kraken.radius, draw::KRAKEN);
        }

        let half = Vec2::new(player.half_width(), player.half_height());
        let center = player.pos + offset;
        canvas.fill_rect(center - half, center + half, draw::PLAYER);

        if self.phase == GamePhase::GameOver {
            canvas.text(self.screen / 2.0, "Game Over", draw::TEXT);
        }
    }

    // === Accessors ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn highscore(&self) -> u32 {
        self.highscore
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn meteors(&self) -> &[Meteor] {
        &self.meteors
    }

    pub fn kraken(&self) -> Option<&Kraken> {
        self.kraken.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn shockwave(&self) -> &Shockwave {
        &self.shockwave
    }

    pub fn shake_offset(&self) -> Vec2 {
        self.shake.offset()
    }

    /// Seconds since the current session started
    pub fn elapsed(&self) -> f32 {
        self.spawner.elapsed()
    }

    fn has_screen(&self) -> bool {
        self.screen.x > 0.0 && self.screen.y > 0.0
    }

    fn new_player(&self) -> Player {
        Player::new(
            self.screen,
            self.config.player_width_fraction * self.screen.x,
            self.config.player_height_fraction * self.screen.y,
        )
    }
}
