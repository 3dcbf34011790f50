//! Geometry for the drawn primitives

use glam::Vec2;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Square of side `side` centered at `center`
    pub fn square(center: Vec2, side: f32) -> Self {
        Self {
            min: center - Vec2::splat(side / 2.0),
            size: Vec2::splat(side),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }
}

/// Downward cone with its apex at `apex`, `depth` tall and `2 * depth` wide
pub fn cone(apex: Vec2, depth: f32) -> [Vec2; 3] {
    let base = apex.y + depth;
    [
        apex,
        Vec2::new(apex.x - depth, base),
        Vec2::new(apex.x + depth, base),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_is_symmetric() {
        let [apex, left, right] = cone(Vec2::new(100.0, 50.0), 30.0);
        assert_eq!(apex, Vec2::new(100.0, 50.0));
        assert_eq!(left, Vec2::new(70.0, 80.0));
        assert_eq!(right, Vec2::new(130.0, 80.0));
    }

    #[test]
    fn test_square_rect() {
        let rect = Rect::square(Vec2::new(10.0, 10.0), 40.0);
        assert_eq!(rect.min, Vec2::new(-10.0, -10.0));
        assert_eq!(rect.max(), Vec2::new(30.0, 30.0));
        assert_eq!(rect.size, Vec2::splat(40.0));
    }
}
