//! # traffic-evo
//!
//! A genetic optimizer for vehicle acceleration profiles at traffic lights.
//!
//! The engine is generic: anything implementing [`Individual`](population::individual::Individual)
//! can be evolved. Each generation ranks the population, keeps the elite,
//! reports progress, and refills the population by mutating survivors.
//! The [`traffic`] module supplies the concrete problem: a point-mass vehicle
//! approaching a fixed-cycle light.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use traffic_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let config = OptimizerConfig::default()
//!     .num_individuals(50)
//!     .num_after_culling(10)
//!     .num_iterations(500);
//!
//! let best = traffic_evo::traffic::optimize_with(TrafficLight::default(), config, &mut rng)?;
//! println!("{best}");
//! # Ok::<(), EvolutionError>(())
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod genome;
pub mod operators;
pub mod population;
pub mod reporting;
pub mod traffic;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::OptimizerConfig;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::reporting::{
        JsonTrajectoryReporter, NullReporter, ProgressReporter, TracingReporter,
    };
    pub use crate::traffic::{
        AccelerationProfile, AccelerationStrategy, Approach, KinematicSimulator, LightState,
        PerformanceScore, Scorer, Simulator, StrategyFactory, TrafficLight, TrajectoryLog,
    };
}
