//! Dedicated simulation thread
//!
//! The engine is moved onto its own thread, which measures frame time,
//! ticks the simulation and forwards events. Other threads talk to it
//! through the [`LoopHandle`]: input goes through the lock-free
//! [`InputHandle`], lifecycle commands through a channel. Both are read
//! only between ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::frame::FrameClock;
use crate::sim::{Engine, EventSink, GameEvent, InputHandle, SoundCue};

/// Lifecycle requests from the UI thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopCommand {
    Resize { width: u32, height: u32 },
    Reset,
    Pause,
    SurfaceLost,
    SetHighscore(u32),
}

/// Running simulation thread
pub struct LoopHandle {
    input: InputHandle,
    commands: Sender<LoopCommand>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<Engine>>,
}

/// Where the loop sends its output
pub struct LoopOutputs<S> {
    pub events: S,
    pub sounds: Sender<SoundCue>,
}

/// Start the simulation thread
pub fn spawn<S>(engine: Engine, outputs: LoopOutputs<S>) -> std::io::Result<LoopHandle>
where
    S: EventSink + Send + 'static,
{
    let input = InputHandle::new();
    let (commands, command_rx) = mpsc::channel();
    let running = Arc::new(AtomicBool::new(true));

    let thread = {
        let input = input.clone();
        let running = Arc::clone(&running);
        thread::Builder::new()
            .name("starfall-sim".into())
            .spawn(move || run(engine, outputs, input, command_rx, running))?
    };

    Ok(LoopHandle {
        input,
        commands,
        running,
        thread: Some(thread),
    })
}

impl LoopHandle {
    /// Shared input cell; clone it into the UI's event handlers
    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    /// Queue a lifecycle command for the next tick boundary
    pub fn send(&self, command: LoopCommand) {
        if self.commands.send(command).is_err() {
            log::warn!("Simulation thread gone, dropping {:?}", command);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the loop to exit after the current tick and hand back the engine.
    /// `None` if the thread panicked.
    pub fn stop(mut self) -> Option<Engine> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<Engine> {
        self.running.store(false, Ordering::Release);
        let thread = self.thread.take()?;
        match thread.join() {
            Ok(engine) => Some(engine),
            Err(_) => {
                log::error!("Simulation thread panicked");
                None
            }
        }
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<S: EventSink>(
    mut engine: Engine,
    mut outputs: LoopOutputs<S>,
    input: InputHandle,
    commands: Receiver<LoopCommand>,
    running: Arc<AtomicBool>,
) -> Engine {
    let frame_time = Duration::from_secs_f32(engine.config().target_frame_time());
    let mut clock = FrameClock::new(engine.config());
    let mut last = Instant::now();
    log::info!("Simulation thread started ({} fps target)", engine.config().target_fps);

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();
        let tick = clock.tick(frame_start.duration_since(last).as_secs_f32());
        last = frame_start;

        loop {
            match commands.try_recv() {
                Ok(command) => apply_command(&mut engine, command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    running.store(false, Ordering::Release);
                    break;
                }
            }
        }

        engine.apply_input(&input);
        engine.update(tick.dt);

        engine.flush_events(&mut outputs.events);
        if let Some(fps) = tick.fps {
            outputs.events.emit(GameEvent::FpsChanged(fps));
        }
        for cue in engine.drain_sound_cues() {
            if outputs.sounds.send(cue).is_err() {
                log::debug!("Sound receiver dropped, discarding {:?}", cue);
            }
        }

        let spent = frame_start.elapsed();
        if spent < frame_time {
            thread::sleep(frame_time - spent);
        }
    }

    log::info!("Simulation thread stopped");
    engine
}

fn apply_command(engine: &mut Engine, command: LoopCommand) {
    match command {
        LoopCommand::Resize { width, height } => engine.resize(width, height),
        LoopCommand::Reset => engine.reset(),
        LoopCommand::Pause => engine.pause(),
        LoopCommand::SurfaceLost => engine.on_surface_lost(),
        LoopCommand::SetHighscore(value) => engine.set_highscore(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::GamePhase;

    fn start() -> (LoopHandle, Receiver<GameEvent>, Receiver<SoundCue>) {
        let (event_tx, event_rx) = mpsc::channel();
        let (sound_tx, sound_rx) = mpsc::channel();
        let engine = Engine::with_seed(GameConfig::default(), 5);
        let handle = spawn(
            engine,
            LoopOutputs {
                events: event_tx,
                sounds: sound_tx,
            },
        )
        .unwrap();
        (handle, event_rx, sound_rx)
    }

    #[test]
    fn test_loop_runs_session_and_returns_engine() {
        let (handle, events, sounds) = start();
        handle.send(LoopCommand::Resize {
            width: 400,
            height: 800,
        });
        handle.send(LoopCommand::Reset);
        handle.input().set_target_x(120.0);

        let first = events.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, GameEvent::ScoreChanged(0));

        // First shot is due after 0.18 s of simulated time
        let cue = sounds.recv_timeout(Duration::from_secs(3)).unwrap();
        assert_eq!(cue, SoundCue::Laser);

        let engine = handle.stop().unwrap();
        assert_ne!(engine.phase(), GamePhase::Waiting);
        assert!(engine.elapsed() > 0.0);
        assert_eq!(engine.player().unwrap().target_x, 120.0);
    }

    #[test]
    fn test_loop_survives_dropped_sound_receiver() {
        let (handle, events, sounds) = start();
        drop(sounds);
        handle.send(LoopCommand::Resize {
            width: 400,
            height: 800,
        });
        handle.send(LoopCommand::Reset);
        events.recv_timeout(Duration::from_secs(2)).unwrap();
        // Long enough for at least one shot's cue to be discarded
        thread::sleep(Duration::from_millis(400));

        let engine = handle.stop().unwrap();
        assert!(engine.stats().bullets_fired > 0);
    }

    #[test]
    fn test_pause_command_halts_simulation() {
        let (handle, events, _sounds) = start();
        handle.send(LoopCommand::Resize {
            width: 400,
            height: 800,
        });
        handle.send(LoopCommand::Reset);
        events.recv_timeout(Duration::from_secs(2)).unwrap();
        handle.send(LoopCommand::Pause);
        thread::sleep(Duration::from_millis(50));

        let engine = handle.stop().unwrap();
        assert_eq!(engine.phase(), GamePhase::Waiting);
    }
}
