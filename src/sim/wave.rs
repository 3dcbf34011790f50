//! A single expanding, rotating ripple

use glam::Vec2;

use super::sprite::SpriteHandle;

/// A ripple anchored at `start`, travelling along `dir`
///
/// Negative `time` is the pre-roll: the wave rises straight up out of its
/// anchor at `|dir|` px/s and only starts travelling along `dir` at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub sprite: SpriteHandle,
    /// Anchor, follows the owning thing
    pub start: Vec2,
    /// Velocity (px/s); its length is the propagation speed
    pub dir: Vec2,
    /// Angular frequency (rad/s)
    pub frequency: f32,
    /// Seconds since the wave became visible
    pub time: f32,
}

impl Wave {
    pub fn new(sprite: SpriteHandle, start: Vec2, dir: Vec2, frequency: f32, time: f32) -> Self {
        Self {
            sprite,
            start,
            dir,
            frequency,
            time,
        }
    }

    #[inline]
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
    }

    /// Apparent position
    pub fn position(&self) -> Vec2 {
        if self.time < 0.0 {
            self.start - Vec2::Y * (self.dir.length() * -self.time)
        } else {
            self.start + self.dir * self.time
        }
    }

    /// Rotation angle (radians)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.time * self.frequency
    }

    /// Distance travelled along `dir`
    #[inline]
    pub fn displacement(&self) -> f32 {
        (self.dir * self.time).length()
    }

    /// True once the wave has travelled further than `depth`
    #[inline]
    pub fn is_expired(&self, depth: f32) -> bool {
        self.displacement() > depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wave(dir: Vec2, time: f32) -> Wave {
        Wave::new(SpriteHandle(0), Vec2::new(100.0, 200.0), dir, 2.0, time)
    }

    #[test]
    fn test_pre_roll_rises_straight_up() {
        // Direction points right, but the pre-roll ignores its angle
        let w = wave(Vec2::new(40.0, 0.0), -0.5);
        assert_eq!(w.position(), Vec2::new(100.0, 180.0));
    }

    #[test]
    fn test_travels_along_dir_after_zero() {
        let w = wave(Vec2::new(-40.0, 0.0), 0.5);
        assert_eq!(w.position(), Vec2::new(80.0, 200.0));
    }

    #[test]
    fn test_position_continuous_at_zero() {
        let before = wave(Vec2::new(40.0, 0.0), -1e-4).position();
        let at = wave(Vec2::new(40.0, 0.0), 0.0).position();
        assert!(before.distance(at) < 0.01);
        assert_eq!(at, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn test_angle_follows_time_in_both_regimes() {
        assert_eq!(wave(Vec2::X, -0.5).angle(), -1.0);
        assert_eq!(wave(Vec2::X, 1.5).angle(), 3.0);
    }

    #[test]
    fn test_expiry_threshold() {
        let mut w = wave(Vec2::new(40.0, 0.0), 2.49);
        assert!(!w.is_expired(100.0));
        w.update(0.02);
        assert!(w.is_expired(100.0));
    }

    proptest! {
        #[test]
        fn prop_expired_iff_travelled_past_depth(speed in 1.0f32..500.0, time in 0.0f32..20.0, depth in 1.0f32..2000.0) {
            let w = wave(Vec2::new(0.0, speed), time);
            prop_assert_eq!(w.is_expired(depth), speed * time > depth);
        }
    }
}
