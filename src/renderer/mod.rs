//! Rendering contract
//!
//! The simulation never draws directly. [`draw_state`] walks a
//! [`GameState`] and issues calls on a [`VideoOutput`] sink; the backend
//! owns the sprite images and the actual rasterization.

pub mod recorder;
pub mod shapes;

pub use recorder::{CommandBuffer, DrawCommand, SpriteLadder};
pub use shapes::Rect;

use glam::Vec2;

use crate::palette::{self, Color};
use crate::sim::{GameState, SpriteHandle, Thing, Wave};

/// Passive video output
pub trait VideoOutput {
    /// Color multiplied into every later draw call
    fn set_mask(&mut self, mask: Color);
    fn clear(&mut self, color: Color);
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);
    /// Draw a ladder sprite centered at `center`, rotated by `angle` radians
    fn draw_sprite(&mut self, sprite: SpriteHandle, center: Vec2, angle: f32);
}

/// Draw one frame: background, hits, things, explosions
pub fn draw_state(state: &GameState, out: &mut dyn VideoOutput) {
    out.set_mask(palette::WHITE);
    out.clear(state.background);

    let light_up = state.tuning.hits.light_up_time;
    for hit in &state.hits {
        out.set_mask(hit.current_color(light_up));
        out.draw_sprite(hit.sprite, hit.position, hit.angle);
    }

    for thing in &state.things {
        draw_thing(thing, out);
    }

    for explosion in &state.explosions {
        out.set_mask(explosion.color);
        draw_waves(&explosion.waves, out);
    }

    out.set_mask(palette::WHITE);
}

fn draw_thing(thing: &Thing, out: &mut dyn VideoOutput) {
    out.set_mask(palette::WHITE);
    out.draw_polygon(&shapes::cone(thing.position, thing.depth), thing.color);
    out.set_mask(thing.color);
    draw_waves(&thing.waves, out);
}

fn draw_waves(waves: &[Wave], out: &mut dyn VideoOutput) {
    for wave in waves {
        out.draw_sprite(wave.sprite, wave.position(), wave.angle());
    }
}
