//! Contract violations raised by the simulation core

use thiserror::Error;

use super::thing::ThingId;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// A hit needs at least one wave to freeze
    #[error("cannot take a hit from a thing without waves")]
    EmptyWaves,
    #[error("thing {0:?} is not in the game")]
    MissingThing(ThingId),
    #[error("waypoint time {time} does not follow previous time {previous}")]
    NonIncreasingWaypoint { previous: f32, time: f32 },
    #[error("waypoint time {0} is not finite")]
    NonFiniteWaypoint(f32),
}
