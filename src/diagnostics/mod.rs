//! Diagnostics and statistics
//!
//! This module provides per-generation statistics for optimization runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::population::individual::Individual;
use crate::population::population::Population;

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number
    pub generation: usize,
    /// Fitness of the best survivor
    pub best_fitness: f64,
    /// Fitness of the worst survivor (the elite cutoff)
    pub elite_threshold: f64,
    /// Mean fitness of the refilled population
    pub mean_fitness: f64,
    /// Fitness standard deviation of the refilled population
    pub fitness_std: f64,
    /// Individuals kept by selection
    pub survivors: usize,
    /// Individuals synthesized this generation
    pub replenished: usize,
    /// Wall time of the generation (ms)
    pub elapsed_ms: f64,
}

impl GenerationStats {
    /// Start statistics from the survivors of selection
    pub fn from_survivors<I: Individual>(survivors: &Population<I>, generation: usize) -> Self {
        Self {
            generation,
            best_fitness: survivors
                .best()
                .map_or(f64::NEG_INFINITY, |i| i.fitness()),
            elite_threshold: survivors.worst().map_or(f64::INFINITY, |i| i.fitness()),
            mean_fitness: survivors.mean_fitness().unwrap_or(0.0),
            fitness_std: survivors.fitness_std().unwrap_or(0.0),
            survivors: survivors.len(),
            replenished: 0,
            elapsed_ms: 0.0,
        }
    }

    /// Complete statistics with the refilled population
    pub fn with_population<I: Individual>(mut self, refilled: &Population<I>) -> Self {
        self.mean_fitness = refilled.mean_fitness().unwrap_or(0.0);
        self.fitness_std = refilled.fitness_std().unwrap_or(0.0);
        self.replenished = refilled.len().saturating_sub(self.survivors);
        self
    }

    /// Set the generation wall time
    pub fn with_elapsed(mut self, duration: Duration) -> Self {
        self.elapsed_ms = duration.as_secs_f64() * 1000.0;
        self
    }
}

/// Statistics collector for an entire optimization run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptimizationHistory {
    /// Statistics per generation
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
}

impl OptimizationHistory {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn record(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Get the best fitness across all generations
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .max_by(|a, b| a.total_cmp(b))
    }

    /// Get the final best fitness
    pub fn final_best_fitness(&self) -> Option<f64> {
        self.generations.last().map(|g| g.best_fitness)
    }

    /// Get the history of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Get the history of elite cutoffs
    pub fn elite_threshold_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.elite_threshold).collect()
    }

    /// Get the history of mean fitness values
    pub fn mean_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean_fitness).collect()
    }

    /// Add to the total runtime
    pub fn add_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms += duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Optimization Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Final best: {:.6}\n\
             - Runtime: {:.2}ms",
            self.num_generations(),
            self.best_fitness().unwrap_or(f64::NEG_INFINITY),
            self.final_best_fitness().unwrap_or(f64::NEG_INFINITY),
            self.total_runtime_ms,
        )
    }
}

pub mod prelude {
    pub use super::{GenerationStats, OptimizationHistory};
}
