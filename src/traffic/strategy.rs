//! Acceleration strategies as search individuals

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, SimulationError};
use crate::genome::bounds::Bounds;
use crate::operators::mutation::UniformPerturbation;
use crate::population::individual::{Individual, IndividualFactory};
use crate::traffic::light::TrafficLight;
use crate::traffic::scoring::{PerformanceScore, Scorer};
use crate::traffic::simulation::{KinematicSimulator, ProfileDriver, Simulator, TrajectoryLog};
use crate::traffic::{MAX_ACC, MAX_CHANGE, MIN_ACC};

/// One acceleration command (m/s²) per simulation step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccelerationProfile(Vec<f64>);

impl AccelerationProfile {
    /// Wrap a sequence of accelerations
    pub fn new(accelerations: Vec<f64>) -> Self {
        Self(accelerations)
    }

    /// Number of steps covered
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the profile is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Acceleration commanded at `step`, if the profile covers it
    pub fn get(&self, step: usize) -> Option<f64> {
        self.0.get(step).copied()
    }

    /// View the accelerations
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Driver replaying this profile
    pub fn driver(&self) -> ProfileDriver<'_> {
        ProfileDriver::new(&self.0)
    }

    /// Take the accelerations out
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for AccelerationProfile {
    fn from(accelerations: Vec<f64>) -> Self {
        Self(accelerations)
    }
}

/// Everything needed to evaluate a profile, shared by all strategies of a run
pub struct Approach {
    light: TrafficLight,
    simulator: Box<dyn Simulator>,
    scorer: Box<dyn Scorer>,
    perturbation: UniformPerturbation,
}

impl Approach {
    /// Kinematic simulation and default scoring against `light`
    pub fn new(light: TrafficLight) -> Self {
        Self {
            light,
            simulator: Box::new(KinematicSimulator::default()),
            scorer: Box::new(PerformanceScore::default()),
            perturbation: UniformPerturbation::new(MAX_CHANGE, Bounds::new(MIN_ACC, MAX_ACC)),
        }
    }

    /// Replace the simulator
    pub fn with_simulator(mut self, simulator: impl Simulator + 'static) -> Self {
        self.simulator = Box::new(simulator);
        self
    }

    /// Replace the scorer
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Replace the mutation operator
    pub fn with_perturbation(mut self, perturbation: UniformPerturbation) -> Self {
        self.perturbation = perturbation;
        self
    }

    /// The scenario every strategy is evaluated against
    pub fn light(&self) -> &TrafficLight {
        &self.light
    }

    /// The mutation operator
    pub fn perturbation(&self) -> &UniformPerturbation {
        &self.perturbation
    }
}

impl fmt::Debug for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Approach")
            .field("light", &self.light)
            .field("perturbation", &self.perturbation)
            .finish_non_exhaustive()
    }
}

/// A scored acceleration profile
///
/// The simulation runs once in [`AccelerationStrategy::new`]; the log and
/// fitness never change afterwards.
#[derive(Clone)]
pub struct AccelerationStrategy {
    profile: AccelerationProfile,
    approach: Arc<Approach>,
    log: TrajectoryLog,
    fitness: f64,
}

impl AccelerationStrategy {
    /// Simulate and score `profile`
    pub fn new(profile: AccelerationProfile, approach: Arc<Approach>) -> EvoResult<Self> {
        let log = approach
            .simulator
            .simulate(&profile.driver(), &approach.light)?;
        let fitness = approach.scorer.score(&log, &approach.light);
        Ok(Self {
            profile,
            approach,
            log,
            fitness,
        })
    }

    /// The evaluated accelerations
    pub fn profile(&self) -> &AccelerationProfile {
        &self.profile
    }

    /// The shared evaluation context
    pub fn approach(&self) -> &Arc<Approach> {
        &self.approach
    }
}

impl Individual for AccelerationStrategy {
    type Trajectory = TrajectoryLog;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> EvoResult<Self> {
        let genes = self
            .approach
            .perturbation
            .perturb(self.profile.as_slice(), rate, rng)?;
        Self::new(genes.into(), Arc::clone(&self.approach))
    }

    fn trajectory(&self) -> &TrajectoryLog {
        &self.log
    }
}

impl fmt::Debug for AccelerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccelerationStrategy")
            .field("fitness", &self.fitness)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AccelerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fitness {:.3} over {} steps", self.fitness, self.profile.len())
    }
}

/// Creates random strategies for one approach
#[derive(Debug, Clone)]
pub struct StrategyFactory {
    approach: Arc<Approach>,
    num_steps: usize,
    initial: Bounds,
}

impl StrategyFactory {
    /// Profiles drawn uniformly from `[0, MAX_ACC]`, one command for every
    /// step the approach's simulator runs
    pub fn new(approach: Approach) -> Result<Self, SimulationError> {
        let num_steps = approach.simulator.num_steps(&approach.light)?;
        Ok(Self {
            approach: Arc::new(approach),
            num_steps,
            initial: Bounds::new(0.0, MAX_ACC),
        })
    }

    /// Override the profile length
    pub fn num_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Set the range initial accelerations are drawn from
    pub fn initial_bounds(mut self, bounds: Bounds) -> Self {
        self.initial = bounds;
        self
    }

    /// The shared evaluation context
    /// The shared evaluation context
    pub fn approach(&self) -> &Arc<Approach> {
        &self.approach
    }

    /// Length of the profiles this factory creates
    pub fn profile_len(&self) -> usize {
        self.num_steps
    }
}

impl IndividualFactory<AccelerationStrategy> for StrategyFactory {
    fn create(&self, rng: &mut StdRng) -> EvoResult<AccelerationStrategy> {
        let profile: Vec<f64> = (0..self.num_steps)
            .map(|_| self.initial.sample(rng))
            .collect();
        AccelerationStrategy::new(profile.into(), Arc::clone(&self.approach))
    }
}
