//! Impact marks left by caught things

use glam::Vec2;

use super::error::SimError;
use super::sprite::SpriteHandle;
use super::thing::Thing;
use crate::palette::{Color, scale_rgb};

/// Brightness of a hit that has just been registered
const HIT_BASE_BRIGHTNESS: f32 = 0.3;

/// Frozen copy of a thing's topmost wave
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub color: Color,
    pub sprite: SpriteHandle,
    pub position: Vec2,
    pub angle: f32,
    /// Seconds since the hit started lighting up
    pub time: f32,
}

impl Hit {
    /// Freeze the topmost wave of `thing`
    pub fn from_thing(thing: &Thing) -> Result<Self, SimError> {
        let wave = thing.topmost_wave().ok_or(SimError::EmptyWaves)?;
        Ok(Self {
            color: thing.color,
            sprite: wave.sprite,
            position: wave.position(),
            angle: wave.angle(),
            time: 0.0,
        })
    }

    #[inline]
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    /// Multiplier ramping from 0.3 to 1.0 over `light_up_time`
    pub fn brightness(&self, light_up_time: f32) -> f32 {
        let m = (self.time / light_up_time).clamp(0.0, 1.0);
        HIT_BASE_BRIGHTNESS + (1.0 - HIT_BASE_BRIGHTNESS) * m * m
    }

    /// Color with the brightness ramp applied, alpha untouched
    pub fn current_color(&self, light_up_time: f32) -> Color {
        scale_rgb(self.color, self.brightness(light_up_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::wave::Wave;
    use glam::Vec4;

    const COLOR: Color = Vec4::new(0.5, 0.5, 0.25, 1.0);

    fn thing_with_waves(ys: &[f32]) -> Thing {
        let mut thing = Thing::new(COLOR, Vec2::ZERO, 1000.0);
        for (i, &y) in ys.iter().enumerate() {
            thing.waves.push(Wave::new(
                SpriteHandle(i),
                Vec2::new(i as f32, y),
                Vec2::new(40.0, 0.0),
                0.5,
                0.0,
            ));
        }
        thing
    }

    #[test]
    fn test_selects_topmost_wave() {
        let hit = Hit::from_thing(&thing_with_waves(&[50.0, 10.0, 30.0])).unwrap();
        assert_eq!(hit.position, Vec2::new(1.0, 10.0));
        assert_eq!(hit.sprite, SpriteHandle(1));
        assert_eq!(hit.color, COLOR);
        assert_eq!(hit.time, 0.0);
    }

    #[test]
    fn test_selection_uses_pre_roll_position() {
        let mut thing = thing_with_waves(&[20.0]);
        // Anchored lower, but rising through its pre-roll: apparent Y = 60 - 40 * 1.5 = 0
        thing.waves.push(Wave::new(SpriteHandle(9), Vec2::new(5.0, 60.0), Vec2::new(-40.0, 0.0), 1.0, -1.5));
        let hit = Hit::from_thing(&thing).unwrap();
        assert_eq!(hit.sprite, SpriteHandle(9));
        assert_eq!(hit.position, Vec2::new(5.0, 0.0));
        assert_eq!(hit.angle, -1.5);
    }

    #[test]
    fn test_empty_thing_is_contract_violation() {
        let thing = Thing::new(COLOR, Vec2::ZERO, 10.0);
        assert_eq!(Hit::from_thing(&thing), Err(SimError::EmptyWaves));
    }

    #[test]
    fn test_brightness_ramp() {
        let mut hit = Hit::from_thing(&thing_with_waves(&[0.0])).unwrap();
        assert!((hit.brightness(2.0) - 0.3).abs() < 1e-6);
        hit.update(1.0);
        assert!((hit.brightness(2.0) - (0.3 + 0.7 * 0.25)).abs() < 1e-6);
        hit.update(5.0);
        assert!((hit.brightness(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_current_color_keeps_alpha() {
        let hit = Hit::from_thing(&thing_with_waves(&[0.0])).unwrap();
        let c = hit.current_color(1.0);
        assert!((c.x - 0.15).abs() < 1e-6);
        assert_eq!(c.w, 1.0);
    }
}
