//! Optimizer configuration
//!
//! `OptimizerConfig` is immutable for the duration of a run. It is validated
//! eagerly when an optimizer is built, so a bad configuration never reaches
//! the generation loop.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the genetic optimizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Total population size
    pub num_individuals: usize,
    /// Number of elite survivors kept by selection
    pub num_after_culling: usize,
    /// Probability that a replacement is produced by mutation
    pub proportion_generated_through_mutation: f64,
    /// Per-gene mutation probability
    pub mutation_parameter: f64,
    /// Number of generations to run
    pub num_iterations: usize,
    /// Report the best individual every this many generations
    pub best_report_interval: usize,
    /// Report all trajectories every this many generations
    pub trajectory_report_interval: usize,
    /// Construct individuals on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            num_individuals: 100,
            num_after_culling: 10,
            proportion_generated_through_mutation: 1.0,
            mutation_parameter: 0.9,
            num_iterations: 10_000,
            best_report_interval: 100,
            trajectory_report_interval: 1000,
            parallel: false,
        }
    }
}

impl OptimizerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the population size
    pub fn num_individuals(mut self, n: usize) -> Self {
        self.num_individuals = n;
        self
    }

    /// Set the elite size
    pub fn num_after_culling(mut self, n: usize) -> Self {
        self.num_after_culling = n;
        self
    }

    /// Set the mutation proportion
    pub fn proportion_generated_through_mutation(mut self, p: f64) -> Self {
        self.proportion_generated_through_mutation = p;
        self
    }

    /// Set the per-gene mutation probability
    pub fn mutation_parameter(mut self, p: f64) -> Self {
        self.mutation_parameter = p;
        self
    }

    /// Set the generation budget
    pub fn num_iterations(mut self, n: usize) -> Self {
        self.num_iterations = n;
        self
    }

    /// Set both reporting intervals
    pub fn report_intervals(mut self, best: usize, trajectories: usize) -> Self {
        self.best_report_interval = best;
        self.trajectory_report_interval = trajectories;
        self
    }

    /// Enable or disable parallel construction
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Number of individuals synthesized each generation
    pub fn num_to_replenish(&self) -> usize {
        self.num_individuals.saturating_sub(self.num_after_culling)
    }

    /// Check every invariant of the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_after_culling == 0 {
            return Err(ConfigError::EmptyElite);
        }
        if self.num_after_culling >= self.num_individuals {
            return Err(ConfigError::CullingTooLarge {
                after_culling: self.num_after_culling,
                individuals: self.num_individuals,
            });
        }
        check_probability("mutation_parameter", self.mutation_parameter)?;
        check_probability(
            "proportion_generated_through_mutation",
            self.proportion_generated_through_mutation,
        )?;
        if self.best_report_interval == 0 {
            return Err(ConfigError::ZeroInterval("best_report_interval"));
        }
        if self.trajectory_report_interval == 0 {
            return Err(ConfigError::ZeroInterval("trajectory_report_interval"));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ProbabilityOutOfRange { name, value });
    }
    Ok(())
}
