//! Vehicle kinematics
//!
//! A driver chooses an acceleration every step; the simulator integrates
//! the motion and records a per-step log against the light's schedule.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::traffic::light::{LightState, TrafficLight};

/// Kinematic state of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// Elapsed time (s)
    pub time: f64,
    /// Distance travelled from the start (m)
    pub position: f64,
    /// Speed (m/s), never negative
    pub velocity: f64,
    /// Acceleration applied over the last step (m/s²)
    pub acceleration: f64,
}

/// Source of acceleration commands
pub trait Driver {
    /// Acceleration to apply during `step`
    fn act(&self, step: usize, state: &VehicleState) -> Result<f64, SimulationError>;
}

/// Replays a precomputed acceleration sequence, one entry per step
#[derive(Debug, Clone, Copy)]
pub struct ProfileDriver<'a> {
    profile: &'a [f64],
}

impl<'a> ProfileDriver<'a> {
    /// Create a driver replaying `profile` from step zero
    pub fn new(profile: &'a [f64]) -> Self {
        Self { profile }
    }

    /// Number of steps the profile covers
    pub fn len(&self) -> usize {
        self.profile.len()
    }

    /// Check if the profile is empty
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }
}

impl Driver for ProfileDriver<'_> {
    fn act(&self, step: usize, _state: &VehicleState) -> Result<f64, SimulationError> {
        self.profile
            .get(step)
            .copied()
            .ok_or(SimulationError::ProfileExhausted {
                step,
                len: self.profile.len(),
            })
    }
}

/// One row of the trajectory log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub light: LightState,
}

/// Moment the vehicle passed the stop line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub time: f64,
    pub light: LightState,
}

impl Crossing {
    /// Check whether the light was red at the crossing
    pub fn ran_red(&self) -> bool {
        self.light == LightState::Red
    }
}

/// Per-step record of a simulated run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryLog {
    pub entries: Vec<LogEntry>,
    pub crossing: Option<Crossing>,
}

impl TrajectoryLog {
    /// Number of recorded steps
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last recorded row
    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Distance covered by the end of the run
    pub fn final_position(&self) -> f64 {
        self.last().map_or(0.0, |e| e.position)
    }

    /// Check whether the vehicle entered the junction on red
    pub fn ran_red_light(&self) -> bool {
        self.crossing.is_some_and(|c| c.ran_red())
    }

    /// Mean squared acceleration over the run
    pub fn mean_squared_acceleration(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.entries.iter().map(|e| e.acceleration.powi(2)).sum();
        sum / self.entries.len() as f64
    }
}

/// Turns a driver into a trajectory log
pub trait Simulator: Send + Sync {
    /// Number of driver commands one run against `light` consumes
    fn num_steps(&self, light: &TrafficLight) -> Result<usize, SimulationError>;

    /// Run the driver through the scenario
    fn simulate(
        &self,
        driver: &dyn Driver,
        light: &TrafficLight,
    ) -> Result<TrajectoryLog, SimulationError>;
}

/// Point-mass vehicle with speed clamped at zero
///
/// Position advances with the mean of the old and new velocity, so a
/// vehicle braking to a stop never rolls backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicSimulator {
    /// Step length (s)
    pub dt: f64,
    /// Speed at time zero (m/s)
    pub initial_speed: f64,
}

impl KinematicSimulator {
    /// Create a simulator starting at rest
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            initial_speed: 0.0,
        }
    }

    /// Set the speed at time zero
    pub fn with_initial_speed(mut self, speed: f64) -> Self {
        self.initial_speed = speed;
        self
    }
}

impl Default for KinematicSimulator {
    fn default() -> Self {
        Self::new(super::DT)
    }
}

impl Simulator for KinematicSimulator {
    fn num_steps(&self, light: &TrafficLight) -> Result<usize, SimulationError> {
        light.num_steps(self.dt)
    }

    fn simulate(
        &self,
        driver: &dyn Driver,
        light: &TrafficLight,
    ) -> Result<TrajectoryLog, SimulationError> {
        let steps = self.num_steps(light)?;
        let mut log = TrajectoryLog {
            entries: Vec::with_capacity(steps),
            crossing: None,
        };
        let mut state = VehicleState {
            velocity: self.initial_speed,
            ..VehicleState::default()
        };

        for step in 0..steps {
            let acceleration = driver.act(step, &state)?;
            let velocity = (state.velocity + acceleration * self.dt).max(0.0);
            let position = state.position + 0.5 * (state.velocity + velocity) * self.dt;
            let time = (step + 1) as f64 * self.dt;

            if !(acceleration.is_finite() && velocity.is_finite() && position.is_finite()) {
                return Err(SimulationError::NonFiniteState { step });
            }

            if log.crossing.is_none() && state.position < light.distance && position >= light.distance
            {
                // linear interpolation inside the step
                let fraction = (light.distance - state.position) / (position - state.position);
                let crossed_at = state.time + fraction * self.dt;
                log.crossing = Some(Crossing {
                    time: crossed_at,
                    light: light.state_at(crossed_at),
                });
            }

            state = VehicleState {
                time,
                position,
                velocity,
                acceleration,
            };
            log.entries.push(LogEntry {
                time,
                position,
                velocity,
                acceleration,
                light: light.state_at(time),
            });
        }

        Ok(log)
    }
}
