//! Director: the scripted storyline
//!
//! Runs on its own thread for the lifetime of the game and drives the
//! phases:
//!
//! ```text
//!            ┌──────────── all things caught ───────────┐
//!            │                                          ▼
//!   intro ─► Danger ◄── explosions cleared ──────── Explosion
//!            │
//!            └── a thing escapes (EscapeBehavior::Colorful) ──► Colorful (forever)
//! ```
//!
//! Every interaction with the game goes through [`Game`]: short locked
//! sections, or [`Game::poll`] for conditions that need several frames.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec2;
use log::{debug, info, warn};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{DIRECTOR_RNG_STREAM, SLEEP_SLICE_SECS};
use crate::game::{Game, Halted};
use crate::palette::{self, Color};
use crate::settings::{EscapeBehavior, Tuning};
use crate::sim::{GamePhase, GameState, SpriteSelector, Thing, ThingId};

/// Source of real-time pauses
pub trait Clock: Send + 'static {
    fn sleep(&self, duration: Duration);
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Storyline notifications
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    PhaseChanged(GamePhase),
    ThingSpawned(ThingId),
    ThingCaught(ThingId),
    ThingEscaped(ThingId),
    HitRegistered(ThingId),
    BackgroundChanged(Color),
}

/// Result of a thing's rise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rise {
    Caught,
    Escaped,
    Vanished,
}

pub struct Director<C: Clock> {
    game: Game,
    tuning: Tuning,
    sprites: SpriteSelector,
    clock: C,
    rng: Pcg32,
    events: Sender<DirectorEvent>,
}

impl<C: Clock> Director<C> {
    pub fn new(
        game: Game,
        tuning: Tuning,
        sprites: SpriteSelector,
        clock: C,
        seed: u64,
    ) -> (Self, Receiver<DirectorEvent>) {
        let (events, receiver) = unbounded();
        let director = Self {
            game,
            tuning,
            sprites,
            clock,
            rng: Pcg32::new(seed, DIRECTOR_RNG_STREAM),
            events,
        };
        (director, receiver)
    }

    /// Run the storyline on a background thread
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::Builder::new()
            .name("director".into())
            .spawn(move || self.run())
            .unwrap_or_else(|e| panic!("failed to spawn director thread: {e}"))
    }

    /// Run the storyline until the game shuts down
    pub fn run(mut self) {
        info!("Director started");
        match self.play() {
            Ok(()) => {}
            Err(Halted) => info!("Director stopped"),
        }
    }

    fn play(&mut self) -> Result<(), Halted> {
        self.set_background(palette::BACKGROUND);
        self.pause(self.tuning.director.intro_delay)?;

        let mut first = true;
        loop {
            self.danger(first)?;
            first = false;

            let phase = self.game.lock().phase;
            match phase {
                GamePhase::Explosion => self.explosion()?,
                GamePhase::Colorful => self.colorful()?,
                GamePhase::Danger => {}
            }
        }
    }

    //--- Danger -----------------------------------------------------------

    fn danger(&mut self, first_cycle: bool) -> Result<(), Halted> {
        let depth = self.tuning.thing_depth();
        let repeat = self.tuning.director.repeat_count;
        info!("Danger cycle started ({} things)", repeat);

        for i in 0..repeat {
            let id = self.spawn_thing(depth, Vec2::ZERO);
            let settle = first_cycle && i == 0;

            match self.rise(id, settle)? {
                Rise::Caught => {
                    debug!("Thing {:?} caught", id);
                    self.emit(DirectorEvent::ThingCaught(id));
                }
                Rise::Escaped => {
                    self.emit(DirectorEvent::ThingEscaped(id));
                    match self.tuning.director.escape {
                        EscapeBehavior::Colorful => {
                            info!("Thing {:?} escaped", id);
                            self.set_phase(GamePhase::Colorful);
                            return Ok(());
                        }
                        EscapeBehavior::Strike => {
                            debug!("Thing {:?} struck the top", id);
                            self.game.with_state(|s| {
                                if let Some(thing) = s.thing_mut(id) {
                                    thing.halt();
                                }
                            });
                        }
                    }
                }
                Rise::Vanished => {
                    warn!("Thing {:?} disappeared while rising", id);
                    continue;
                }
            }

            match self.game.with_state(|s| s.register_hit(id)) {
                Ok(()) => self.emit(DirectorEvent::HitRegistered(id)),
                Err(e) => warn!("No hit for thing {:?}: {}", id, e),
            }

            self.fall(id)?;
            self.game.with_state(|s| s.remove_thing(id));
        }

        self.pause(self.tuning.director.cooldown)?;
        self.set_phase(GamePhase::Explosion);
        Ok(())
    }

    /// Move a thing up until the pointer catches it or it escapes
    fn rise(&self, id: ThingId, settle: bool) -> Result<Rise, Halted> {
        let d = &self.tuning.director;
        let idle = d.poll_idle();

        self.game.poll(idle, |state: &mut GameState| {
            let pointer = state.pointer;
            let height = state.height;
            let Some(thing) = state.thing_mut(id) else {
                return ControlFlow::Break(Rise::Vanished);
            };

            if pointer.distance(thing.position) <= d.catch_radius {
                return ControlFlow::Break(Rise::Caught);
            }

            if settle {
                let target = height * d.settle_height;
                let vy = d.settle_gain * (target - thing.position.y);
                thing.velocity.y = vy.clamp(-d.settle_max_speed, d.settle_max_speed);
            } else {
                if thing.position.y <= d.escape_height {
                    return ControlFlow::Break(Rise::Escaped);
                }
                thing.velocity.y = -d.rise_speed;
            }
            ControlFlow::Continue(())
        })
    }

    /// Accelerate a thing downward until it has left the screen
    fn fall(&self, id: ThingId) -> Result<(), Halted> {
        let d = &self.tuning.director;

        self.game.poll(d.poll_idle(), |state: &mut GameState| {
            let floor = state.height * d.spawn_height;
            let Some(thing) = state.thing_mut(id) else {
                return ControlFlow::Break(());
            };
            if thing.position.y >= floor {
                thing.halt();
                return ControlFlow::Break(());
            }
            thing.acceleration.y = d.fall_gravity;
            ControlFlow::Continue(())
        })
    }

    //--- Explosion --------------------------------------------------------

    fn explosion(&mut self) -> Result<(), Halted> {
        self.pause(self.tuning.hits.light_up_time)?;

        let count = self.game.with_state(|s| s.explode_hits());
        info!("{} hits exploded", count);

        self.pause(self.tuning.director.explosion_duration)?;

        self.game.with_state(|s| s.explosions.clear());
        self.set_phase(GamePhase::Danger);
        Ok(())
    }

    //--- Colorful ---------------------------------------------------------

    fn colorful(&mut self) -> Result<(), Halted> {
        let depth = self.tuning.thing_depth();
        let idle = self.tuning.director.poll_idle();

        self.game.with_state(|s| {
            s.explosions.clear();
            s.hits.clear();
        });

        loop {
            let newest = self.game.lock().newest_thing().map(|t| t.id);
            let Some(id) = newest else {
                // Nothing left to follow: start over with a launched thing
                self.spawn_thing(depth, Vec2::new(0.0, -self.tuning.director.launch_speed));
                continue;
            };

            // Wait until the whole cone has left through the top
            let color = self.game.poll(idle, |state: &mut GameState| {
                match state.thing(id) {
                    None => ControlFlow::Break(None),
                    Some(thing) if thing.position.y <= -thing.depth => {
                        ControlFlow::Break(Some(thing.color))
                    }
                    Some(_) => ControlFlow::Continue(()),
                }
            })?;

            if let Some(color) = color {
                self.set_background(color);
            }
            self.game.with_state(|s| {
                s.remove_thing(id);
                s.hits.clear();
            });

            self.spawn_thing(depth, Vec2::new(0.0, -self.tuning.director.launch_speed));
        }
    }

    //--- Helpers ----------------------------------------------------------

    /// Spawn a pre-warmed thing below the screen at a random X
    ///
    /// Pre-warming runs outside the lock.
    fn spawn_thing(&mut self, depth: f32, velocity: Vec2) -> ThingId {
        let (width, height) = (self.tuning.width, self.tuning.height);
        let position = Vec2::new(
            width * self.rng.random::<f32>(),
            height * self.tuning.director.spawn_height,
        );
        let color = palette::random_thing_color(&mut self.rng);
        let mut thing = Thing::spawn(
            color,
            position,
            depth,
            &self.tuning.waves,
            self.sprites,
            &mut self.rng,
        );
        thing.velocity = velocity;

        let id = self.game.with_state(|s| s.add_thing(thing));
        debug!("Thing {:?} spawned at ({:.0}, {:.0})", id, position.x, position.y);
        self.emit(DirectorEvent::ThingSpawned(id));
        id
    }

    fn set_phase(&self, phase: GamePhase) {
        self.game.with_state(|s| s.phase = phase);
        info!("Phase -> {}", phase.as_str());
        self.emit(DirectorEvent::PhaseChanged(phase));
    }

    fn set_background(&self, color: Color) {
        self.game.with_state(|s| s.background = color);
        self.emit(DirectorEvent::BackgroundChanged(color));
    }

    /// Sleep without holding the lock, in slices so shutdown is noticed
    fn pause(&self, seconds: f32) -> Result<(), Halted> {
        let slice = Duration::from_secs_f32(SLEEP_SLICE_SECS);
        let mut remaining = Duration::from_secs_f32(seconds.max(0.0));
        while !remaining.is_zero() {
            if !self.game.is_running() {
                return Err(Halted);
            }
            let step = remaining.min(slice);
            self.clock.sleep(step);
            remaining -= step;
        }
        if self.game.is_running() {
            Ok(())
        } else {
            Err(Halted)
        }
    }

    fn emit(&self, event: DirectorEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }
}
