//! Headless backend: records draw calls instead of rasterizing them

use glam::Vec2;

use super::VideoOutput;
use super::shapes::Rect;
use crate::palette::{self, Color};
use crate::settings::SpriteTuning;
use crate::sim::{SpriteHandle, SpriteSelector};

/// Fixed ladder of square sprite sizes, built once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteLadder {
    sizes: Vec<f32>,
}

impl SpriteLadder {
    /// Sizes from `min` to `max` inclusive in `step` increments
    pub fn new(min: f32, max: f32, step: f32) -> Self {
        assert!(step > 0.0, "Sprite step must be positive, got {}", step);
        let count = ((max - min) / step).floor() as usize + 1;
        let sizes = (0..count).map(|i| min + i as f32 * step).collect();
        Self { sizes }
    }

    pub fn from_tuning(tuning: &SpriteTuning) -> Self {
        Self::new(tuning.min_size, tuning.max_size, tuning.step)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Side length of a sprite; out-of-range handles clamp to the largest
    pub fn size(&self, sprite: SpriteHandle) -> f32 {
        let index = sprite.0.min(self.sizes.len().saturating_sub(1));
        self.sizes.get(index).copied().unwrap_or(0.0)
    }

    /// Handle picker for the simulation
    pub fn selector(&self) -> SpriteSelector {
        SpriteSelector::new(self.sizes.len())
    }
}

impl Default for SpriteLadder {
    fn default() -> Self {
        Self::from_tuning(&SpriteTuning::default())
    }
}

/// A recorded draw call, mask already applied
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { color: Color },
    Polygon { points: Vec<Vec2>, color: Color },
    Sprite { rect: Rect, angle: f32, color: Color },
}

/// Draw-call recorder
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    ladder: SpriteLadder,
    mask: Color,
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new(ladder: SpriteLadder) -> Self {
        Self {
            ladder,
            mask: palette::WHITE,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn sprite_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count()
    }
}

impl VideoOutput for CommandBuffer {
    fn set_mask(&mut self, mask: Color) {
        self.mask = mask;
    }

    fn clear(&mut self, color: Color) {
        // A clear starts a new frame
        self.commands.clear();
        self.commands.push(DrawCommand::Clear {
            color: color * self.mask,
        });
    }

    fn draw_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color: color * self.mask,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteHandle, center: Vec2, angle: f32) {
        self.commands.push(DrawCommand::Sprite {
            rect: Rect::square(center, self.ladder.size(sprite)),
            angle,
            color: self.mask,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_default_ladder() {
        let ladder = SpriteLadder::default();
        assert_eq!(ladder.len(), 21);
        assert_eq!(ladder.size(SpriteHandle(0)), 40.0);
        assert_eq!(ladder.size(SpriteHandle(20)), 140.0);
        assert_eq!(ladder.size(SpriteHandle(99)), 140.0);
        assert_eq!(ladder.selector().count(), 21);
    }

    #[test]
    fn test_mask_multiplies_colors() {
        let mut out = CommandBuffer::new(SpriteLadder::default());
        out.set_mask(Vec4::new(0.5, 1.0, 1.0, 1.0));
        out.clear(Vec4::new(0.4, 0.4, 0.4, 1.0));
        out.draw_polygon(&[Vec2::ZERO, Vec2::X, Vec2::Y], Vec4::ONE);
        out.draw_sprite(SpriteHandle(2), Vec2::new(100.0, 100.0), 0.5);

        assert_eq!(
            out.commands(),
            &[
                DrawCommand::Clear { color: Vec4::new(0.2, 0.4, 0.4, 1.0) },
                DrawCommand::Polygon {
                    points: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
                    color: Vec4::new(0.5, 1.0, 1.0, 1.0),
                },
                DrawCommand::Sprite {
                    rect: Rect::square(Vec2::new(100.0, 100.0), 50.0),
                    angle: 0.5,
                    color: Vec4::new(0.5, 1.0, 1.0, 1.0),
                },
            ]
        );
    }

    #[test]
    fn test_clear_starts_new_frame() {
        let mut out = CommandBuffer::new(SpriteLadder::default());
        out.clear(Vec4::ONE);
        out.draw_sprite(SpriteHandle(0), Vec2::ZERO, 0.0);
        out.clear(Vec4::ONE);
        assert_eq!(out.len(), 1);
        assert_eq!(out.sprite_count(), 0);
    }
}
