//! Simulation module
//!
//! Everything that moves lives here. No locking, no threads and no drawing:
//! callers hand in `dt`, an RNG and the tuning.

pub mod error;
pub mod explosion;
pub mod hit;
pub mod sprite;
pub mod state;
pub mod thing;
pub mod trajectory;
pub mod wave;

pub use error::SimError;
pub use explosion::Explosion;
pub use hit::Hit;
pub use sprite::{SpriteHandle, SpriteSelector};
pub use state::{GamePhase, GameState};
pub use thing::{Thing, ThingId};
pub use trajectory::Trajectory;
pub use wave::Wave;
