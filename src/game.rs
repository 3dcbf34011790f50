//! Shared game handle
//!
//! The frame driver and the director both reach the [`GameState`] through
//! one mutex. The frame driver signals a condvar after every update, which
//! lets director polls run exactly once per frame without spinning.
//!
//! ```text
//!   frame driver                         director thread
//!   ────────────                         ───────────────
//!   update(dt) ──lock──► GameState ◄──lock── poll(step)
//!        └── notify_all ──► frame_ready ──► wait (lock released)
//!   draw(out)  ──lock──► renderer::draw_state
//! ```

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use glam::Vec2;
use log::info;

use crate::director::{Clock, Director, DirectorEvent};
use crate::renderer::{self, VideoOutput};
use crate::settings::{ConfigError, Tuning};
use crate::sim::{GameState, SpriteSelector};

/// Returned by director waits once the game has been shut down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halted;

struct Shared {
    state: Mutex<GameState>,
    frame_ready: Condvar,
    running: AtomicBool,
}

/// Cloneable handle to the shared game state
#[derive(Clone)]
pub struct Game {
    shared: Arc<Shared>,
}

impl Game {
    pub fn new(state: GameState) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                frame_ready: Condvar::new(),
                running: AtomicBool::new(true),
            }),
        }
    }

    /// Validate `tuning`, build the game state and start its director thread
    ///
    /// The seed comes from `tuning.seed`, or the OS when absent.
    pub fn start<C: Clock>(
        tuning: Tuning,
        sprites: SpriteSelector,
        clock: C,
    ) -> Result<(Self, thread::JoinHandle<()>, Receiver<DirectorEvent>), ConfigError> {
        tuning.validate()?;
        let seed = tuning.seed.unwrap_or_else(rand::random);
        info!(
            "Starting game {}x{} (seed: {})",
            tuning.width, tuning.height, seed
        );

        let game = Self::new(GameState::new(tuning.clone(), sprites, seed));
        let (director, events) = Director::new(game.clone(), tuning, sprites, clock, seed);
        let handle = director.spawn();
        Ok((game, handle, events))
    }

    /// Lock the state, recovering from a poisoned mutex
    pub fn lock(&self) -> MutexGuard<'_, GameState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the state locked
    pub fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut state = self.lock();
        f(&mut state)
    }

    /// Advance the simulation by one frame and wake any waiting poll
    pub fn update(&self, dt: f32) {
        self.lock().update(dt);
        self.shared.frame_ready.notify_all();
    }

    /// Draw the current state into `out`
    pub fn draw(&self, out: &mut dyn VideoOutput) {
        let state = self.lock();
        renderer::draw_state(&state, out);
    }

    pub fn set_pointer(&self, pointer: Vec2) {
        self.lock().pointer = pointer;
    }

    /// Repeat `step` once per frame until it breaks
    ///
    /// `step` runs with the lock held. Between steps the lock is released
    /// while waiting for the next frame; `idle` bounds each wait so a
    /// shutdown is noticed even when no frames arrive.
    pub fn poll<T>(
        &self,
        idle: Duration,
        mut step: impl FnMut(&mut GameState) -> ControlFlow<T>,
    ) -> Result<T, Halted> {
        let mut state = self.lock();
        loop {
            if !self.is_running() {
                return Err(Halted);
            }
            if let ControlFlow::Break(value) = step(&mut state) {
                return Ok(value);
            }
            let seen = state.frame;
            let (guard, _) = self
                .shared
                .frame_ready
                .wait_timeout_while(state, idle, |s| s.frame == seen && self.is_running())
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Stop the director at its next wait
    pub fn shutdown(&self) {
        info!("Game shutting down");
        self.shared.running.store(false, Ordering::Release);
        self.shared.frame_ready.notify_all();
    }
}
