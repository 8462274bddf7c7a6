//! Traffic light scenario
//!
//! A fixed-cycle light at a known distance ahead of the vehicle.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::traffic::{MAX_HORIZON, MAX_STEPS};

/// Signal state of the light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightState {
    Red,
    Green,
}

/// A traffic light with a periodic red/green schedule
///
/// Each cycle starts with `red_duration` seconds of red followed by
/// `green_duration` seconds of green. `offset` shifts the schedule so that
/// time zero lies `offset` seconds into the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLight {
    /// Distance from the vehicle's start to the stop line (m)
    pub distance: f64,
    /// Length of the red phase (s)
    pub red_duration: f64,
    /// Length of the green phase (s)
    pub green_duration: f64,
    /// Position within the cycle at time zero (s)
    pub offset: f64,
    /// Simulated time horizon (s)
    pub max_time: f64,
}

impl TrafficLight {
    /// Create a light that is red for `red_duration` from time zero
    pub fn new(distance: f64, red_duration: f64, green_duration: f64, max_time: f64) -> Self {
        Self {
            distance,
            red_duration,
            green_duration,
            offset: 0.0,
            max_time,
        }
    }

    /// Shift the schedule
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Signal state at time `t`
    pub fn state_at(&self, t: f64) -> LightState {
        let cycle = self.red_duration + self.green_duration;
        if (t + self.offset).rem_euclid(cycle) < self.red_duration {
            LightState::Red
        } else {
            LightState::Green
        }
    }

    /// Check whether the light shows green at time `t`
    pub fn is_green(&self, t: f64) -> bool {
        self.state_at(t) == LightState::Green
    }

    /// Number of simulation steps of length `dt` covering the horizon
    ///
    /// Fails unless the count lies in `1..=MAX_STEPS`.
    pub fn num_steps(&self, dt: f64) -> Result<usize, SimulationError> {
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(SimulationError::InvalidScenario(format!(
                "time step must be positive, got {}",
                dt
            )));
        }
        let steps = (self.max_time / dt).round();
        if !(steps >= 1.0 && steps <= MAX_STEPS as f64) {
            return Err(SimulationError::InvalidScenario(format!(
                "horizon of {} s at {} s per step needs {} steps, expected 1 to {}",
                self.max_time, dt, steps, MAX_STEPS
            )));
        }
        Ok(steps as usize)
    }

    /// Reject physically meaningless scenarios
    pub fn validate(&self) -> Result<(), SimulationError> {
        let finite = [
            self.distance,
            self.red_duration,
            self.green_duration,
            self.offset,
            self.max_time,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(SimulationError::InvalidScenario(
                "all parameters must be finite".to_string(),
            ));
        }
        if self.distance <= 0.0 {
            return Err(SimulationError::InvalidScenario(format!(
                "distance must be positive, got {}",
                self.distance
            )));
        }
        if self.red_duration < 0.0 || self.green_duration < 0.0 {
            return Err(SimulationError::InvalidScenario(
                "phase durations must be non-negative".to_string(),
            ));
        }
        if self.red_duration + self.green_duration <= 0.0 {
            return Err(SimulationError::InvalidScenario(
                "cycle length must be positive".to_string(),
            ));
        }
        if self.max_time <= 0.0 || self.max_time > MAX_HORIZON {
            return Err(SimulationError::InvalidScenario(format!(
                "max_time must lie in (0, {}], got {}",
                MAX_HORIZON, self.max_time
            )));
        }
        Ok(())
    }
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new(50.0, 4.0, 6.0, super::NUM_STEPS as f64 * super::DT)
    }
}
