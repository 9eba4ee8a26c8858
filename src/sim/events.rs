//! Events the simulation publishes to the presentation layer
//!
//! The engine queues events during a tick; the host drains them and forwards
//! them to whatever consumes them (a channel to the UI thread, a listener
//! object, or a `Vec` in tests).

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

/// Listener-facing events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fired on every score change with the new total
    ScoreChanged(u32),
    /// Fired once per session on the terminal collision
    GameOver(u32),
    /// Measured by the host loop, not the simulation
    FpsChanged(u32),
    /// Shockwave availability and cooldown progress (0..=1)
    ShockwaveState { ready: bool, cooldown_fraction: f32 },
}

/// Callback-style consumer
pub trait GameEventListener {
    fn on_score_changed(&mut self, score: u32);
    fn on_game_over(&mut self, final_score: u32);
    fn on_fps_changed(&mut self, fps: u32);
    fn on_shockwave_state(&mut self, ready: bool, cooldown_fraction: f32);
}

impl GameEvent {
    /// Route this event to the matching listener callback
    pub fn dispatch<L: GameEventListener + ?Sized>(self, listener: &mut L) {
        match self {
            GameEvent::ScoreChanged(score) => listener.on_score_changed(score),
            GameEvent::GameOver(score) => listener.on_game_over(score),
            GameEvent::FpsChanged(fps) => listener.on_fps_changed(fps),
            GameEvent::ShockwaveState {
                ready,
                cooldown_fraction,
            } => listener.on_shockwave_state(ready, cooldown_fraction),
        }
    }
}

/// Anything that can accept a stream of events without blocking
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        // Receiver gone means the UI shut down; nothing left to notify
        if self.send(event).is_err() {
            log::debug!("Event receiver dropped, discarding {:?}", event);
        }
    }
}

/// Adapts a listener object into a sink
pub struct ListenerSink<L>(pub L);

impl<L: GameEventListener> EventSink for ListenerSink<L> {
    fn emit(&mut self, event: GameEvent) {
        event.dispatch(&mut self.0);
    }
}

/// Audio cues for the sound layer; values only, no playback here
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SoundCue {
    /// A bullet was fired
    Laser,
    /// A meteor blew up, or the shockwave went off
    Explosion,
    KrakenExplosion,
    /// Kraken swim loop; pitch follows the speed factor (0.7..1.6)
    KrakenLoopStart { speed_factor: f32 },
    KrakenLoopStop,
    GameOver,
    /// Game over with a score above the previous best
    Highscore,
}
