//! Wavefall - an animated wave toy
//!
//! Core modules:
//! - `sim`: Simulation (things, waves, hits, explosions, game state)
//! - `game`: Shared game handle (one lock, frame signal)
//! - `director`: Background task that scripts the storyline
//! - `renderer`: Output sink contract and headless command recorder
//! - `settings`: Data-driven tuning

pub mod director;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use director::{Clock, Director, DirectorEvent, SystemClock};
pub use game::{Game, Halted};
pub use settings::{ConfigError, Tuning};

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single uninterrupted director sleep
    pub const SLEEP_SLICE_SECS: f32 = 0.25;
    /// Default sprite ladder (square sizes in pixels)
    pub const SPRITE_MIN_SIZE: f32 = 40.0;
    pub const SPRITE_MAX_SIZE: f32 = 140.0;
    pub const SPRITE_SIZE_STEP: f32 = 5.0;
    /// Pre-roll duration of a freshly spawned wave (seconds before it becomes visible)
    pub const WAVE_PRE_ROLL: f32 = 1.0;
    /// Cap on the simulation steps spent pre-warming one thing
    pub const MAX_PREWARM_STEPS: u32 = 100_000;
    /// PCG stream of the game state's RNG (waves, explosions)
    pub const STATE_RNG_STREAM: u64 = 1;
    /// PCG stream of the director's RNG (spawn positions, colors)
    pub const DIRECTOR_RNG_STREAM: u64 = 2;
}

/// Colors
pub mod palette {
    use glam::Vec4;
    use rand::Rng;

    /// RGBA color, channels in 0..1
    pub type Color = Vec4;

    pub const WHITE: Color = Vec4::ONE;
    pub const BACKGROUND: Color = Vec4::new(0.1, 0.1, 0.1, 1.0);

    /// Brightness of every thing color (sum of the RGB channels)
    const THING_COLOR_SUM: f32 = 1.25;

    /// Random saturated color with a fixed channel sum
    pub fn random_thing_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
        loop {
            let r: f32 = rng.random();
            let g: f32 = rng.random();
            let b: f32 = rng.random();
            let sum = r + g + b;
            if sum == 0.0 {
                continue;
            }
            let k = THING_COLOR_SUM / sum;
            return Vec4::new(r * k, g * k, b * k, 1.0);
        }
    }

    /// Scale RGB by `factor`, leaving alpha untouched
    #[inline]
    pub fn scale_rgb(color: Color, factor: f32) -> Color {
        Vec4::new(color.x * factor, color.y * factor, color.z * factor, color.w)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        #[test]
        fn test_thing_color_channel_sum() {
            let mut rng = Pcg32::seed_from_u64(7);
            for _ in 0..100 {
                let c = random_thing_color(&mut rng);
                assert!((c.x + c.y + c.z - 1.25).abs() < 1e-4);
                assert_eq!(c.w, 1.0);
            }
        }

        #[test]
        fn test_scale_rgb_keeps_alpha() {
            let c = scale_rgb(Vec4::new(0.5, 0.4, 0.2, 0.8), 0.5);
            assert_eq!(c, Vec4::new(0.25, 0.2, 0.1, 0.8));
        }
    }
}

/// Point on a circle of radius `r` at angle `theta`
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> glam::Vec2 {
    glam::Vec2::new(r * theta.cos(), r * theta.sin())
}
