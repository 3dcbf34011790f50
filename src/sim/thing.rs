//! Things: kinematic bodies that shed waves while alive

use glam::Vec2;
use rand::Rng;

use super::sprite::SpriteSelector;
use super::wave::Wave;
use crate::consts::WAVE_PRE_ROLL;
use crate::palette::Color;
use crate::settings::WaveTuning;

/// Stable identifier assigned when a thing joins the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThingId(pub u32);

/// A moving body with its own population of waves
#[derive(Debug, Clone)]
pub struct Thing {
    pub id: ThingId,
    pub color: Color,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Maximum wave travel distance, also the size of the drawn cone
    pub depth: f32,
    /// Seconds until the next wave spawns
    pub spawn_timer: f32,
    /// Order is not stable: expired waves are swap-removed
    pub waves: Vec<Wave>,
}

impl Thing {
    /// A motionless thing without waves
    ///
    /// # Panics
    ///
    /// Panics if `depth <= 0.0`.
    pub fn new(color: Color, position: Vec2, depth: f32) -> Self {
        assert!(depth > 0.0, "Thing depth must be positive, got {}", depth);
        Self {
            id: ThingId(0),
            color,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            depth,
            spawn_timer: 0.0,
            waves: Vec::new(),
        }
    }

    /// A thing pre-warmed to a steady wave population
    ///
    /// Runs `depth / propagation_speed` seconds of simulated time in place so
    /// the thing never shows up empty. At most `MAX_PREWARM_STEPS` steps run.
    pub fn spawn<R: Rng + ?Sized>(
        color: Color,
        position: Vec2,
        depth: f32,
        tuning: &WaveTuning,
        sprites: SpriteSelector,
        rng: &mut R,
    ) -> Self {
        let mut thing = Self::new(color, position, depth);
        for _ in 0..tuning.prewarm_steps(depth) {
            thing.update(tuning.prewarm_step, tuning, sprites, rng);
        }
        thing
    }

    /// Advance kinematics and waves by `dt`
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        tuning: &WaveTuning,
        sprites: SpriteSelector,
        rng: &mut R,
    ) {
        // Semi-implicit Euler
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;

        self.spawn_timer -= dt;

        let mut i = 0;
        while i < self.waves.len() {
            let wave = &mut self.waves[i];
            wave.start = self.position;
            wave.update(dt);
            if wave.is_expired(self.depth) {
                self.waves.swap_remove(i);
            } else {
                i += 1;
            }
        }

        if self.spawn_timer < 0.0 {
            self.spawn_wave(tuning, sprites, rng);
        }
    }

    fn spawn_wave<R: Rng + ?Sized>(
        &mut self,
        tuning: &WaveTuning,
        sprites: SpriteSelector,
        rng: &mut R,
    ) {
        let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let mut frequency = tuning.frequency.sample(rng);
        if side < 0.0 {
            frequency = -frequency;
        }

        self.waves.push(Wave::new(
            sprites.pick(rng),
            self.position,
            Vec2::new(side, 0.0) * tuning.propagation_speed,
            frequency,
            -WAVE_PRE_ROLL,
        ));
        self.spawn_timer = tuning.spawn_interval.sample(rng);
    }

    /// The wave with the smallest apparent Y (highest on screen)
    pub fn topmost_wave(&self) -> Option<&Wave> {
        self.waves
            .iter()
            .min_by(|a, b| a.position().y.total_cmp(&b.position().y))
    }

    /// Stop all motion
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
    }
}
