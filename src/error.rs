//! Error types for traffic-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for configuration validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The elite would be at least as large as the whole population
    #[error("num_after_culling ({after_culling}) must be smaller than num_individuals ({individuals})")]
    CullingTooLarge {
        after_culling: usize,
        individuals: usize,
    },

    /// No survivors would remain to breed from
    #[error("num_after_culling must be at least 1")]
    EmptyElite,

    /// A probability parameter lies outside [0, 1]
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    /// A reporting interval of zero
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    /// Configuration could not be parsed
    #[error("Invalid configuration document: {0}")]
    Parse(String),
}

/// Error type for the simulation collaborator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// The driver was asked for a step its profile does not cover
    #[error("Acceleration profile exhausted at step {step} (length {len})")]
    ProfileExhausted { step: usize, len: usize },

    /// Vehicle state became NaN or infinite
    #[error("Non-finite vehicle state at step {step}")]
    NonFiniteState { step: usize },

    /// The scenario cannot be simulated
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

/// Error type for progress reporters
///
/// Reporter failures never abort an optimization run.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error while writing a report
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// Population size drifted away from the configured size
    #[error("Population size invariant violated: expected {expected}, got {actual}")]
    PopulationSizeInvariant { expected: usize, actual: usize },

    /// Simulation failed while constructing an individual
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Factory or mutation failed for a reason of its own
    #[error("Individual construction failed: {0}")]
    Individual(String),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,

    /// The run was cancelled between generations
    #[error("Optimization cancelled before generation {generation}")]
    Cancelled { generation: usize },
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
