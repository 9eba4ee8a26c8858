//! Starfall headless runner
//!
//! Plays one session with a simple autopilot, logs what happens and keeps
//! the highscore file up to date.
//!
//! Usage: `starfall [seed] [max_seconds] [--live]`
//!
//! `STARFALL_CONFIG` and `STARFALL_HIGHSCORE` override the file locations.

use std::sync::mpsc;
use std::time::Duration;

use starfall::game_loop::{self, LoopCommand, LoopOutputs};
use starfall::sim::{DrawList, Engine, GameEventListener, GamePhase, ListenerSink};
use starfall::{GameConfig, HighscoreStore};

const SCREEN_WIDTH: u32 = 720;
const SCREEN_HEIGHT: u32 = 1280;

/// Forwards game events to the log
struct LogListener;

impl GameEventListener for LogListener {
    fn on_score_changed(&mut self, score: u32) {
        log::debug!("Score: {}", score);
    }

    fn on_game_over(&mut self, final_score: u32) {
        log::info!("GAME OVER - final score {}", final_score);
    }

    fn on_fps_changed(&mut self, fps: u32) {
        log::debug!("FPS: {}", fps);
    }

    fn on_shockwave_state(&mut self, ready: bool, cooldown_fraction: f32) {
        if ready {
            log::info!("Shockwave ready");
        } else {
            log::trace!("Shockwave cooldown {:.0}%", cooldown_fraction * 100.0);
        }
    }
}

struct Args {
    seed: Option<u64>,
    max_seconds: f32,
    live: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        seed: None,
        max_seconds: 120.0,
        live: false,
    };
    let mut positional = 0;
    for arg in std::env::args().skip(1) {
        if arg == "--live" {
            args.live = true;
            continue;
        }
        match positional {
            0 => args.seed = arg.parse().ok(),
            1 => args.max_seconds = arg.parse().unwrap_or(args.max_seconds),
            _ => log::warn!("Ignoring extra argument {:?}", arg),
        }
        positional += 1;
    }
    args
}

/// Chase the lowest meteor in reach; shockwave when one gets too close
fn autopilot(engine: &Engine) -> (Option<f32>, bool) {
    let Some(player) = engine.player() else {
        return (None, false);
    };
    let danger_line = player.top() - engine.screen().y * 0.2;

    let lowest = engine
        .meteors()
        .iter()
        .filter(|m| m.pos.y < player.top())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    let target = lowest
        .map(|m| m.pos.x)
        .or_else(|| engine.kraken().map(|k| k.pos.x));
    let panic = lowest.is_some_and(|m| m.pos.y + m.radius > danger_line);
    (target, panic)
}

fn run_headless(mut engine: Engine, max_seconds: f32) -> Engine {
    let mut sink = ListenerSink(LogListener);
    let dt = engine.config().target_frame_time();

    while engine.phase() == GamePhase::Running && engine.elapsed() < max_seconds {
        let (target, panic) = autopilot(&engine);
        if let Some(x) = target {
            engine.set_player_target(x);
        }
        if panic && engine.shockwave().is_ready() {
            engine.activate_shockwave();
        }
        engine.update(dt);
        engine.flush_events(&mut sink);
        for cue in engine.drain_sound_cues() {
            log::trace!("Sound: {:?}", cue);
        }
    }
    engine
}

fn run_live(engine: Engine, max_seconds: f32) -> Option<Engine> {
    let highscore = engine.highscore();
    let (sounds, sound_rx) = mpsc::channel();
    let handle = match game_loop::spawn(
        engine,
        LoopOutputs {
            events: ListenerSink(LogListener),
            sounds,
        },
    ) {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Could not start simulation thread: {}", e);
            return None;
        }
    };

    handle.send(LoopCommand::Resize {
        width: SCREEN_WIDTH,
        height: SCREEN_HEIGHT,
    });
    handle.send(LoopCommand::SetHighscore(highscore));
    handle.send(LoopCommand::Reset);

    // Sweep the ship back and forth from this thread
    let started = std::time::Instant::now();
    while started.elapsed().as_secs_f32() < max_seconds {
        let t = started.elapsed().as_secs_f32();
        let x = (0.5 + 0.4 * (t * 1.3).sin()) * SCREEN_WIDTH as f32;
        handle.input().set_target_x(x);
        if t % 12.5 < 0.05 {
            handle.input().request_shockwave();
        }
        while let Ok(cue) = sound_rx.try_recv() {
            log::trace!("Sound: {:?}", cue);
        }
        std::thread::sleep(Duration::from_millis(16));
    }
    handle.stop()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> starfall::Result<()> {
    let args = parse_args();
    log::info!("Starfall starting...");

    let config_path =
        std::env::var("STARFALL_CONFIG").unwrap_or_else(|_| "starfall.json".to_string());
    let highscore_path = std::env::var("STARFALL_HIGHSCORE")
        .unwrap_or_else(|_| "starfall_highscore.json".to_string());

    let config = GameConfig::load(&config_path)?;
    let mut store = HighscoreStore::load(&highscore_path)?;

    let mut engine = match args.seed {
        Some(seed) => {
            log::info!("Using seed {}", seed);
            Engine::with_seed(config, seed)
        }
        None => Engine::new(config),
    };
    engine.set_highscore(store.get());

    let engine = if args.live {
        match run_live(engine, args.max_seconds) {
            Some(engine) => engine,
            None => return Ok(()),
        }
    } else {
        engine.resize(SCREEN_WIDTH, SCREEN_HEIGHT);
        engine.reset();
        run_headless(engine, args.max_seconds)
    };

    let mut frame = DrawList::new();
    engine.draw(&mut frame);
    log::debug!("Final frame: {} draw commands", frame.len());

    let best = store.save_if_higher(engine.score())?;
    let stats = engine.stats();
    log::info!(
        "Session over after {:.1}s: score {}, best {}",
        engine.elapsed(),
        engine.score(),
        best
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
