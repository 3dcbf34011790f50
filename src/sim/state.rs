//! Game state shared between the frame driver and the director
//!
//! Nothing here locks; `crate::game::Game` wraps the whole struct in a
//! single mutex.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::error::SimError;
use super::explosion::Explosion;
use super::hit::Hit;
use super::sprite::SpriteSelector;
use super::thing::{Thing, ThingId};
use crate::consts::STATE_RNG_STREAM;
use crate::palette::{self, Color};
use crate::settings::Tuning;

/// Current phase of the storyline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Things rise one after another and must be caught
    Danger,
    /// Hits light up and burst
    Explosion,
    /// A thing escaped; colors cycle forever
    Colorful,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Danger => "Danger",
            GamePhase::Explosion => "Explosion",
            GamePhase::Colorful => "Colorful",
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    /// Insertion order is kept: the last thing is the newest
    pub things: Vec<Thing>,
    pub hits: Vec<Hit>,
    pub explosions: Vec<Explosion>,
    /// Last known pointer position (screen px, Y down)
    pub pointer: Vec2,
    pub background: Color,
    /// Frames simulated so far
    pub frame: u64,
    pub tuning: Tuning,
    pub sprites: SpriteSelector,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    pub fn new(tuning: Tuning, sprites: SpriteSelector, seed: u64) -> Self {
        Self {
            width: tuning.width,
            height: tuning.height,
            phase: GamePhase::Danger,
            things: Vec::new(),
            hits: Vec::new(),
            explosions: Vec::new(),
            pointer: Vec2::ZERO,
            background: palette::BACKGROUND,
            frame: 0,
            tuning,
            sprites,
            rng: Pcg32::new(seed, STATE_RNG_STREAM),
            next_id: 1,
        }
    }

    /// Advance everything by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        if self.phase == GamePhase::Explosion {
            for hit in &mut self.hits {
                hit.update(dt);
            }
            for explosion in &mut self.explosions {
                explosion.update(dt);
            }
        }
        for thing in &mut self.things {
            thing.update(dt, &self.tuning.waves, self.sprites, &mut self.rng);
        }
        self.frame += 1;
    }

    /// Add a thing and assign its id
    pub fn add_thing(&mut self, mut thing: Thing) -> ThingId {
        let id = ThingId(self.next_id);
        self.next_id += 1;
        thing.id = id;
        self.things.push(thing);
        id
    }

    /// Remove a thing, keeping the order of the rest
    pub fn remove_thing(&mut self, id: ThingId) -> Option<Thing> {
        let index = self.things.iter().position(|t| t.id == id)?;
        Some(self.things.remove(index))
    }

    pub fn thing(&self, id: ThingId) -> Option<&Thing> {
        self.things.iter().find(|t| t.id == id)
    }

    pub fn thing_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.iter_mut().find(|t| t.id == id)
    }

    pub fn newest_thing(&self) -> Option<&Thing> {
        self.things.last()
    }

    /// Freeze the topmost wave of a thing as a hit
    pub fn register_hit(&mut self, id: ThingId) -> Result<(), SimError> {
        let thing = self.thing(id).ok_or(SimError::MissingThing(id))?;
        let hit = Hit::from_thing(thing)?;
        self.hits.push(hit);
        Ok(())
    }

    /// Turn every hit into an explosion and clear the hits
    pub fn explode_hits(&mut self) -> usize {
        let hits = std::mem::take(&mut self.hits);
        for hit in &hits {
            let explosion =
                Explosion::from_hit(hit, &self.tuning.explosion, self.sprites, &mut self.rng);
            self.explosions.push(explosion);
        }
        hits.len()
    }

    /// Total waves on screen
    pub fn wave_count(&self) -> usize {
        self.things.iter().map(|t| t.waves.len()).sum::<usize>()
            + self.explosions.iter().map(|e| e.waves.len()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const COLOR: Color = Vec4::new(0.4, 0.4, 0.45, 1.0);

    fn state() -> GameState {
        GameState::new(Tuning::default(), SpriteSelector::new(21), 12345)
    }

    #[test]
    fn test_new_state() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Danger);
        assert_eq!(state.width, 1024.0);
        assert!(state.things.is_empty());
        assert_eq!(state.background, palette::BACKGROUND);
    }

    #[test]
    fn test_ids_are_unique_and_order_kept() {
        let mut state = state();
        let a = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 10.0));
        let b = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 10.0));
        let c = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 10.0));
        assert_ne!(a, b);
        assert!(state.remove_thing(b).is_some());
        assert!(state.remove_thing(b).is_none());
        assert_eq!(state.things.iter().map(|t| t.id).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(state.newest_thing().map(|t| t.id), Some(c));
    }

    #[test]
    fn test_update_counts_frames_and_moves_things() {
        let mut state = state();
        let id = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 100.0));
        state.thing_mut(id).unwrap().velocity = Vec2::new(0.0, -60.0);
        state.update(0.5);
        assert_eq!(state.frame, 1);
        assert_eq!(state.thing(id).unwrap().position, Vec2::new(0.0, -30.0));
    }

    #[test]
    fn test_hits_only_light_up_during_explosion_phase() {
        let mut state = state();
        let id = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 100.0));
        state.update(0.1);
        state.register_hit(id).unwrap();

        state.update(1.0);
        assert_eq!(state.hits[0].time, 0.0);

        state.phase = GamePhase::Explosion;
        state.update(1.0);
        assert_eq!(state.hits[0].time, 1.0);
    }

    #[test]
    fn test_register_hit_without_waves_fails() {
        let mut state = state();
        let id = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 100.0));
        assert_eq!(state.register_hit(id), Err(SimError::EmptyWaves));
        assert!(state.hits.is_empty());
    }

    #[test]
    fn test_register_hit_for_removed_thing_fails() {
        let mut state = state();
        let id = state.add_thing(Thing::new(COLOR, Vec2::ZERO, 100.0));
        state.update(0.1);
        state.remove_thing(id);
        assert_eq!(state.register_hit(id), Err(SimError::MissingThing(id)));
    }

    #[test]
    fn test_explode_hits_converts_every_hit() {
        let mut state = state();
        let id = state.add_thing(Thing::new(COLOR, Vec2::new(10.0, 10.0), 100.0));
        state.update(0.1);
        state.register_hit(id).unwrap();
        state.register_hit(id).unwrap();

        assert_eq!(state.explode_hits(), 2);
        assert!(state.hits.is_empty());
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(
            state.wave_count(),
            1 + 2 * state.tuning.explosion.wave_count
        );
    }
}
