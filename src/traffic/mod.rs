//! Traffic light approach problem
//!
//! A vehicle starts at rest some distance before a stop line and picks one
//! acceleration per time step. The search looks for the profile that covers
//! the most ground without entering the junction on red, while keeping the
//! ride smooth.
//!
//! The engine only sees [`AccelerationStrategy`] through the
//! [`Individual`](crate::population::individual::Individual) trait; the
//! physics and the scoring sit behind [`Simulator`] and [`Scorer`].

pub mod light;
pub mod scoring;
pub mod simulation;
pub mod strategy;

use rand::Rng;
use tracing::instrument;

use crate::algorithms::genetic_optimizer::GeneticOptimizer;
use crate::config::OptimizerConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::population::individual::Individual;

pub use light::{LightState, TrafficLight};
pub use scoring::{PerformanceScore, Scorer};
pub use simulation::{
    Crossing, Driver, KinematicSimulator, LogEntry, ProfileDriver, Simulator, TrajectoryLog,
    VehicleState,
};
pub use strategy::{AccelerationProfile, AccelerationStrategy, Approach, StrategyFactory};

/// Number of acceleration commands in a profile
pub const NUM_STEPS: usize = 100;
/// Simulation step length (s)
pub const DT: f64 = 0.1;
/// Hardest braking (m/s²)
pub const MIN_ACC: f64 = -5.0;
/// Strongest acceleration (m/s²)
pub const MAX_ACC: f64 = 3.0;
/// Largest change a single mutation applies to one command (m/s²)
pub const MAX_CHANGE: f64 = 1.0;
/// Longest simulated horizon a light may ask for (s)
pub const MAX_HORIZON: f64 = 3600.0;
/// Most simulation steps a single run may take
pub const MAX_STEPS: usize = 1_000_000;

/// Search the default configuration for the best profile through `light`
pub fn optimize<R: Rng + ?Sized>(light: TrafficLight, rng: &mut R) -> EvoResult<AccelerationStrategy> {
    optimize_with(light, OptimizerConfig::default(), rng)
}

/// Search with an explicit configuration, reporting through `tracing`
#[instrument(level = "info", skip_all, fields(distance = light.distance, generations = config.num_iterations))]
pub fn optimize_with<R: Rng + ?Sized>(
    light: TrafficLight,
    config: OptimizerConfig,
    rng: &mut R,
) -> EvoResult<AccelerationStrategy> {
    light.validate()?;
    let factory = StrategyFactory::new(Approach::new(light))?;
    let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory)
        .config(config)
        .build(rng)?;
    optimizer.optimize(rng)?;

    let best = optimizer
        .best()
        .cloned()
        .ok_or(EvolutionError::EmptyPopulation)?;
    tracing::info!(
        fitness = best.fitness(),
        ran_red = best.trajectory().ran_red_light(),
        "best strategy found"
    );
    Ok(best)
}
