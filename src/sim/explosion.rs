//! Radial bursts of waves anchored at a hit

use glam::Vec2;
use rand::Rng;

use super::hit::Hit;
use super::sprite::SpriteSelector;
use super::wave::Wave;
use crate::palette::Color;
use crate::polar_to_cartesian;
use crate::settings::ExplosionTuning;

#[derive(Debug, Clone)]
pub struct Explosion {
    pub color: Color,
    pub origin: Vec2,
    pub waves: Vec<Wave>,
}

impl Explosion {
    /// Burst of `wave_count` waves, visible immediately (no pre-roll)
    pub fn from_hit<R: Rng + ?Sized>(
        hit: &Hit,
        tuning: &ExplosionTuning,
        sprites: SpriteSelector,
        rng: &mut R,
    ) -> Self {
        let waves = (0..tuning.wave_count)
            .map(|_| {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let speed = tuning.speed.sample(rng);
                let frequency = tuning.frequency.sample(rng);
                Wave::new(
                    sprites.pick(rng),
                    hit.position,
                    polar_to_cartesian(speed, angle),
                    frequency,
                    0.0,
                )
            })
            .collect();

        Self {
            color: hit.color,
            origin: hit.position,
            waves,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for wave in &mut self.waves {
            wave.update(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sprite::SpriteHandle;
    use glam::Vec4;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn hit() -> Hit {
        Hit {
            color: Vec4::new(0.2, 0.4, 0.6, 1.0),
            sprite: SpriteHandle(3),
            position: Vec2::new(300.0, 200.0),
            angle: 0.0,
            time: 1.0,
        }
    }

    #[test]
    fn test_burst_shape() {
        let tuning = ExplosionTuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let explosion = Explosion::from_hit(&hit(), &tuning, SpriteSelector::new(21), &mut rng);

        assert_eq!(explosion.waves.len(), tuning.wave_count);
        assert_eq!(explosion.color, hit().color);
        for wave in &explosion.waves {
            assert_eq!(wave.time, 0.0);
            assert_eq!(wave.start, hit().position);
            assert_eq!(wave.position(), hit().position);
            let speed = wave.dir.length();
            assert!(speed >= tuning.speed.min - 1e-3 && speed <= tuning.speed.max + 1e-3);
            assert!(wave.frequency >= tuning.frequency.min && wave.frequency <= tuning.frequency.max);
        }
    }

    #[test]
    fn test_update_moves_every_wave_outward() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut explosion =
            Explosion::from_hit(&hit(), &ExplosionTuning::default(), SpriteSelector::new(4), &mut rng);
        explosion.update(0.5);
        for wave in &explosion.waves {
            assert_eq!(wave.time, 0.5);
            assert!(wave.position().distance(explosion.origin) > 0.0);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let tuning = ExplosionTuning {
            wave_count: 0,
            ..ExplosionTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let explosion = Explosion::from_hit(&hit(), &tuning, SpriteSelector::new(1), &mut rng);
        assert!(explosion.waves.is_empty());
    }
}
