//! Tuning and configuration
//!
//! Every constant that shapes the animation lives here. Loaded from JSON,
//! missing fields fall back to the defaults below.

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_PREWARM_STEPS, SPRITE_MAX_SIZE, SPRITE_MIN_SIZE, SPRITE_SIZE_STEP};

/// Configuration loading/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Closed range `[min, max]` sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw; a zero-width band returns `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..self.max)
        }
    }

    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{name}: band [{}, {}] is not ordered",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Sprite ladder sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpriteTuning {
    pub min_size: f32,
    pub max_size: f32,
    pub step: f32,
}

impl Default for SpriteTuning {
    fn default() -> Self {
        Self {
            min_size: SPRITE_MIN_SIZE,
            max_size: SPRITE_MAX_SIZE,
            step: SPRITE_SIZE_STEP,
        }
    }
}

/// Waves spawned by things
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveTuning {
    /// Seconds between two spawns of the same thing
    pub spawn_interval: Band,
    /// Angular frequency (rad/s), negated for left-going waves
    pub frequency: Band,
    /// Sideways propagation speed (px/s)
    pub propagation_speed: f32,
    /// Step used to pre-warm a new thing
    pub prewarm_step: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            spawn_interval: Band::new(0.25, 0.75),
            frequency: Band::new(0.5, 2.0),
            propagation_speed: 80.0,
            prewarm_step: 1.0 / 60.0,
        }
    }
}

impl WaveTuning {
    /// Pre-warm steps that cover `depth / propagation_speed` seconds
    fn raw_prewarm_steps(&self, depth: f32) -> f32 {
        (depth / self.propagation_speed / self.prewarm_step).ceil()
    }

    /// Steps needed to pre-warm a thing of `depth`, capped at `MAX_PREWARM_STEPS`
    pub fn prewarm_steps(&self, depth: f32) -> u32 {
        self.raw_prewarm_steps(depth).min(MAX_PREWARM_STEPS as f32) as u32
    }
}

/// Impact marks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HitTuning {
    /// Seconds for a hit to reach full brightness
    pub light_up_time: f32,
}

impl Default for HitTuning {
    fn default() -> Self {
        Self { light_up_time: 3.0 }
    }
}

/// Radial bursts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplosionTuning {
    pub wave_count: usize,
    /// Outward speed (px/s)
    pub speed: Band,
    /// Angular frequency (rad/s)
    pub frequency: Band,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            wave_count: 16,
            speed: Band::new(100.0, 400.0),
            frequency: Band::new(1.0, 4.0),
        }
    }
}

/// What happens when a thing rises past the escape height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EscapeBehavior {
    /// Switch to the endless colorful phase
    #[default]
    Colorful,
    /// Stop the thing and register a hit as if it had been caught
    Strike,
}

/// Storyline pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorTuning {
    /// Delay before the first thing appears (seconds)
    pub intro_delay: f32,
    /// Things per danger cycle
    pub repeat_count: u32,
    /// Thing depth as a multiple of the larger screen dimension
    pub depth_factor: f32,
    /// Spawn height as a fraction of screen height (below the bottom edge)
    pub spawn_height: f32,
    /// Pointer distance that catches a thing (px)
    pub catch_radius: f32,
    /// Resting height of the very first thing, fraction of screen height
    pub settle_height: f32,
    /// Proportional gain of the settling motion (1/s)
    pub settle_gain: f32,
    /// Settling speed cap (px/s)
    pub settle_max_speed: f32,
    /// Rising speed of every other thing (px/s)
    pub rise_speed: f32,
    /// Y coordinate at which a rising thing has escaped
    pub escape_height: f32,
    pub escape: EscapeBehavior,
    /// Downward acceleration after a hit (px/s^2)
    pub fall_gravity: f32,
    /// Pause after a full danger cycle (seconds)
    pub cooldown: f32,
    /// How long explosions stay on screen (seconds)
    pub explosion_duration: f32,
    /// Upward launch speed of colorful things (px/s)
    pub launch_speed: f32,
    /// Longest wait for a frame before re-checking shutdown (ms)
    pub poll_idle_ms: u64,
}

impl Default for DirectorTuning {
    fn default() -> Self {
        Self {
            intro_delay: 5.0,
            repeat_count: 12,
            depth_factor: 1.5,
            spawn_height: 1.1,
            catch_radius: 77.0,
            settle_height: 0.8,
            settle_gain: 1.1,
            settle_max_speed: 50.0,
            rise_speed: 100.0,
            escape_height: -77.0,
            escape: EscapeBehavior::Colorful,
            fall_gravity: 1000.0,
            cooldown: 5.0,
            explosion_duration: 5.0,
            launch_speed: 1000.0,
            poll_idle_ms: 50,
        }
    }
}

impl DirectorTuning {
    pub fn poll_idle(&self) -> Duration {
        Duration::from_millis(self.poll_idle_ms)
    }
}

/// Complete tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// RNG seed, random when absent
    pub seed: Option<u64>,
    pub width: f32,
    pub height: f32,
    /// Frame driver rate
    pub fps: f32,
    pub sprites: SpriteTuning,
    pub waves: WaveTuning,
    pub hits: HitTuning,
    pub explosion: ExplosionTuning,
    pub director: DirectorTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: None,
            width: 1024.0,
            height: 768.0,
            fps: 60.0,
            sprites: SpriteTuning::default(),
            waves: WaveTuning::default(),
            hits: HitTuning::default(),
            explosion: ExplosionTuning::default(),
            director: DirectorTuning::default(),
        }
    }
}

impl Tuning {
    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Parse and validate tuning from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Thing depth for the current screen size
    pub fn thing_depth(&self) -> f32 {
        self.director.depth_factor * self.width.max(self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }
        fn non_negative(name: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must not be negative, got {value}")))
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("fps", self.fps)?;

        positive("sprites.min_size", self.sprites.min_size)?;
        positive("sprites.step", self.sprites.step)?;
        if self.sprites.max_size < self.sprites.min_size {
            return Err(ConfigError::Invalid("sprite ladder is empty".into()));
        }

        self.waves.spawn_interval.check("waves.spawn_interval")?;
        self.waves.frequency.check("waves.frequency")?;
        positive("waves.spawn_interval.min", self.waves.spawn_interval.min)?;
        positive("waves.propagation_speed", self.waves.propagation_speed)?;
        positive("waves.prewarm_step", self.waves.prewarm_step)?;

        positive("hits.light_up_time", self.hits.light_up_time)?;

        self.explosion.speed.check("explosion.speed")?;
        self.explosion.frequency.check("explosion.frequency")?;

        let d = &self.director;
        if d.repeat_count == 0 {
            return Err(ConfigError::Invalid("director.repeat_count must be at least 1".into()));
        }
        non_negative("director.intro_delay", d.intro_delay)?;
        positive("director.depth_factor", d.depth_factor)?;
        let steps = self.waves.raw_prewarm_steps(self.thing_depth());
        if steps > MAX_PREWARM_STEPS as f32 {
            return Err(ConfigError::Invalid(format!(
                "waves.prewarm_step too small: pre-warm would take {steps} steps (max {MAX_PREWARM_STEPS})"
            )));
        }
        positive("director.catch_radius", d.catch_radius)?;
        positive("director.settle_max_speed", d.settle_max_speed)?;
        positive("director.rise_speed", d.rise_speed)?;
        positive("director.fall_gravity", d.fall_gravity)?;
        non_negative("director.cooldown", d.cooldown)?;
        non_negative("director.explosion_duration", d.explosion_duration)?;
        positive("director.launch_speed", d.launch_speed)?;
        if d.poll_idle_ms == 0 {
            return Err(ConfigError::Invalid("director.poll_idle_ms must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "width": 640, "director": { "repeat_count": 3 } }"#)
            .unwrap();
        assert_eq!(tuning.width, 640.0);
        assert_eq!(tuning.height, 768.0);
        assert_eq!(tuning.director.repeat_count, 3);
        assert_eq!(tuning.director.catch_radius, 77.0);
        assert_eq!(tuning.explosion.wave_count, 16);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Tuning::from_json(r#"{ "widht": 640 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_reversed_band_rejected() {
        let err = Tuning::from_json(r#"{ "waves": { "frequency": { "min": 3, "max": 1 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_repeat_count_rejected() {
        let mut tuning = Tuning::default();
        tuning.director.repeat_count = 0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_tiny_prewarm_step_rejected() {
        let mut tuning = Tuning::default();
        tuning.waves.prewarm_step = 1e-7;
        let err = tuning.validate().unwrap_err();
        assert!(err.to_string().contains("waves.prewarm_step"), "{err}");

        tuning.waves.prewarm_step = 1e-3;
        tuning.validate().unwrap();
    }

    #[test]
    fn test_json_round_trip_keeps_escape_behavior() {
        let mut tuning = Tuning::default();
        tuning.director.escape = EscapeBehavior::Strike;
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back.director.escape, EscapeBehavior::Strike);
    }

    #[test]
    fn test_thing_depth_uses_larger_dimension() {
        let tuning = Tuning::default();
        assert_eq!(tuning.thing_depth(), 1.5 * 1024.0);
    }

    #[test]
    fn test_band_sample_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let band = Band::new(2.0, 3.0);
        for _ in 0..200 {
            let v = band.sample(&mut rng);
            assert!((2.0..3.0).contains(&v));
        }
        assert_eq!(Band::new(4.0, 4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
