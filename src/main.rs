//! Wavefall entry point
//!
//! Headless frame driver: feeds the pointer, updates and draws the game at
//! a fixed rate while the director thread plays the storyline.
//!
//! Usage: `wavefall [config.json] [seconds] [--autopilot]`

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use glam::Vec2;
use log::info;

use wavefall::renderer::{CommandBuffer, SpriteLadder};
use wavefall::sim::Trajectory;
use wavefall::{DirectorEvent, Game, SystemClock, Tuning};

/// Autopilot pointer speed (px/s)
const AUTOPILOT_SPEED: f32 = 600.0;

/// Seconds per leg of the default pointer loop
const POINTER_LEG_SECS: f32 = 3.0;

struct Args {
    config: Option<String>,
    seconds: f32,
    autopilot: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        seconds: 60.0,
        autopilot: false,
    };
    for arg in std::env::args().skip(1) {
        if arg == "--autopilot" {
            args.autopilot = true;
        } else if let Ok(seconds) = arg.parse::<f32>() {
            if !(seconds > 0.0) {
                bail!("run time must be positive, got {seconds}");
            }
            args.seconds = seconds;
        } else if args.config.is_none() {
            args.config = Some(arg);
        } else {
            bail!("unexpected argument: {arg}");
        }
    }
    Ok(args)
}

/// Where the pointer goes next
enum PointerSource {
    /// Loop around the screen
    Path(Trajectory),
    /// Chase the newest thing like a perfect player
    Autopilot,
}

impl PointerSource {
    fn new(autopilot: bool, width: f32, height: f32) -> Result<Self> {
        if autopilot {
            return Ok(Self::Autopilot);
        }
        let corner = |fx: f32, fy: f32| Vec2::new(width * fx, height * fy);
        let path = Trajectory::new(0.0, corner(0.1, 0.13))?
            .then(POINTER_LEG_SECS, corner(0.9, 0.13))?
            .then(2.0 * POINTER_LEG_SECS, corner(0.9, 0.8))?
            .then(3.0 * POINTER_LEG_SECS, corner(0.1, 0.8))?
            .then(4.0 * POINTER_LEG_SECS, corner(0.1, 0.13))?
            .cyclic();
        Ok(Self::Path(path))
    }

    fn next(&self, game: &Game, passed: f32, dt: f32) -> Vec2 {
        match self {
            Self::Path(path) => path.at(passed),
            Self::Autopilot => game.with_state(|s| {
                let Some(target) = s.newest_thing().map(|t| t.position) else {
                    return s.pointer;
                };
                let delta = target - s.pointer;
                let max_step = AUTOPILOT_SPEED * dt;
                if delta.length() <= max_step {
                    target
                } else {
                    s.pointer + delta.normalize() * max_step
                }
            }),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let tuning = match &args.config {
        Some(path) => Tuning::load(path).with_context(|| format!("loading {path}"))?,
        None => Tuning::default(),
    };

    // Pre-rendered once, shared with the simulation only as a selector
    let ladder = SpriteLadder::from_tuning(&tuning.sprites);
    info!("Sprite ladder ready ({} sizes)", ladder.len());

    let pointer = PointerSource::new(args.autopilot, tuning.width, tuning.height)?;
    let (game, director, events) = Game::start(tuning.clone(), ladder.selector(), SystemClock)?;

    let dt = 1.0 / tuning.fps;
    let frame_duration = Duration::from_secs_f32(dt);
    let mut out = CommandBuffer::new(ladder);
    let mut passed = 0.0;
    let mut frames = 0u32;
    let mut second = Instant::now();
    let started = Instant::now();

    info!(
        "Running for {}s at {} fps ({} pointer)",
        args.seconds,
        tuning.fps,
        if args.autopilot { "autopilot" } else { "looping" }
    );

    while started.elapsed().as_secs_f32() < args.seconds {
        let frame_start = Instant::now();

        passed += dt;
        game.set_pointer(pointer.next(&game, passed, dt));
        game.update(dt);
        game.draw(&mut out);

        for event in events.try_iter() {
            match event {
                DirectorEvent::PhaseChanged(phase) => info!("Storyline entered {}", phase.as_str()),
                DirectorEvent::BackgroundChanged(color) => {
                    info!("Background -> ({:.2}, {:.2}, {:.2})", color.x, color.y, color.z)
                }
                other => log::debug!("{:?}", other),
            }
        }

        frames += 1;
        if second.elapsed() >= Duration::from_secs(1) {
            let (phase, things, hits, explosions, waves) = game.with_state(|s| {
                (s.phase, s.things.len(), s.hits.len(), s.explosions.len(), s.wave_count())
            });
            info!(
                "FPS: {} | {} | things: {} hits: {} explosions: {} waves: {} | draw calls: {}",
                frames,
                phase.as_str(),
                things,
                hits,
                explosions,
                waves,
                out.len()
            );
            frames = 0;
            second = Instant::now();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    game.shutdown();
    match director.join() {
        Ok(()) => info!("Director terminated cleanly"),
        Err(e) => log::error!("Director panicked: {:?}", e),
    }
    Ok(())
}
