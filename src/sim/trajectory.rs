//! Piecewise-linear path over timestamped waypoints
//!
//! A trajectory maps elapsed time to a point. Cyclic trajectories repeat
//! with a period equal to the time of their last waypoint.

use glam::Vec2;

use super::error::SimError;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: Vec<f32>,
    points: Vec<Vec2>,
    cyclic: bool,
}

impl Trajectory {
    /// Trajectory with a single waypoint, constant until more are added
    pub fn new(time: f32, point: Vec2) -> Result<Self, SimError> {
        if !time.is_finite() {
            return Err(SimError::NonFiniteWaypoint(time));
        }
        Ok(Self {
            times: vec![time],
            points: vec![point],
            cyclic: false,
        })
    }

    /// Make the trajectory repeat with the last waypoint's time as period
    pub fn cyclic(mut self) -> Self {
        self.cyclic = true;
        self
    }

    /// Append a waypoint; `time` must be strictly after the previous one
    pub fn add(&mut self, time: f32, point: Vec2) -> Result<(), SimError> {
        if !time.is_finite() {
            return Err(SimError::NonFiniteWaypoint(time));
        }
        let previous = self.times[self.times.len() - 1];
        if time <= previous {
            return Err(SimError::NonIncreasingWaypoint { previous, time });
        }
        self.times.push(time);
        self.points.push(point);
        Ok(())
    }

    /// Builder form of [`Trajectory::add`]
    pub fn then(mut self, time: f32, point: Vec2) -> Result<Self, SimError> {
        self.add(time, point)?;
        Ok(self)
    }

    /// Number of waypoints (never zero)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Period of a cyclic trajectory
    pub fn period(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Position at `time`
    pub fn at(&self, time: f32) -> Vec2 {
        let mut time = time;
        let period = self.period();
        if self.cyclic && period > 0.0 {
            // Double modulo keeps negative times inside [0, period)
            time = ((time % period) + period) % period;
        }

        if time <= self.times[0] {
            return self.points[0];
        }
        for i in 1..self.times.len() {
            if time <= self.times[i] {
                let (t0, t1) = (self.times[i - 1], self.times[i]);
                let fraction = (time - t0) / (t1 - t0);
                return self.points[i - 1].lerp(self.points[i], fraction);
            }
        }
        self.points[self.points.len() - 1]
    }
}
