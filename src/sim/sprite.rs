//! Sprite selection contract
//!
//! The rendering backend owns the actual images; the simulation only ever
//! sees an index into its ladder.

use rand::Rng;

/// Opaque index into the backend's sprite ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub usize);

/// Picks sprite handles uniformly from `[0, count)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteSelector {
    count: usize,
}

impl SpriteSelector {
    /// # Panics
    ///
    /// Panics if `count == 0`.
    pub fn new(count: usize) -> Self {
        assert!(count > 0, "Sprite selector needs at least one sprite");
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> SpriteHandle {
        SpriteHandle(rng.random_range(0..self.count))
    }
}
