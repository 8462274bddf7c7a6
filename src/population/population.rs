//! Population type
//!
//! This module provides the Population container type.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::EvoResult;
use crate::population::individual::{compare_fitness, Individual, IndividualFactory};

/// An ordered multiset of individuals
///
/// Order only carries meaning right after [`Population::sort_by_fitness`].
#[derive(Clone, Debug)]
pub struct Population<I: Individual> {
    individuals: Vec<I>,
}

impl<I: Individual> Population<I> {
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
        }
    }

    /// Create a population with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<I>) -> Self {
        Self { individuals }
    }

    /// Create a population of `size` individuals from a factory
    ///
    /// Every slot runs on its own RNG seeded from `rng`, so the result does
    /// not depend on whether construction happens in parallel.
    pub fn generate<R, Fac>(size: usize, factory: &Fac, rng: &mut R, parallel: bool) -> EvoResult<Self>
    where
        R: Rng + ?Sized,
        Fac: IndividualFactory<I>,
    {
        let individuals = construct_seeded(size, rng, parallel, |slot_rng| factory.create(slot_rng))?;
        Ok(Self { individuals })
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Get an individual by index
    pub fn get(&self, index: usize) -> Option<&I> {
        self.individuals.get(index)
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: I) {
        self.individuals.push(individual);
    }

    /// Append many individuals
    pub fn extend<It: IntoIterator<Item = I>>(&mut self, individuals: It) {
        self.individuals.extend(individuals);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &I> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[I] {
        &self.individuals
    }

    /// Take the individuals out of this population
    pub fn into_individuals(self) -> Vec<I> {
        self.individuals
    }

    /// Get the best individual (by fitness)
    ///
    /// Ties resolve to the earliest individual.
    pub fn best(&self) -> Option<&I> {
        self.individuals.iter().reduce(|best, candidate| {
            if candidate.is_better_than(best) {
                candidate
            } else {
                best
            }
        })
    }

    /// Get the worst individual (by fitness)
    pub fn worst(&self) -> Option<&I> {
        self.individuals.iter().reduce(|worst, candidate| {
            if worst.is_better_than(candidate) {
                candidate
            } else {
                worst
            }
        })
    }

    /// Sort the population by fitness (best first)
    ///
    /// The sort is stable: equal fitness keeps insertion order.
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| compare_fitness(b.fitness(), a.fitness()));
    }

    /// Keep only the first `size` individuals
    pub fn truncate(&mut self, size: usize) {
        self.individuals.truncate(size);
    }

    /// Truncate the population to the given size, keeping the best individuals
    pub fn truncate_to_best(&mut self, size: usize) {
        self.sort_by_fitness();
        self.individuals.truncate(size);
    }

    /// Fitness values in population order
    pub fn fitnesses(&self) -> Vec<f64> {
        self.individuals.iter().map(|i| i.fitness()).collect()
    }

    /// Trajectory logs of every individual, in population order
    pub fn trajectories(&self) -> Vec<&I::Trajectory> {
        self.individuals.iter().map(|i| i.trajectory()).collect()
    }

    /// Compute mean fitness
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.individuals.is_empty() {
            None
        } else {
            Some(self.individuals.iter().map(|i| i.fitness()).sum::<f64>() / self.len() as f64)
        }
    }

    /// Compute fitness standard deviation
    pub fn fitness_std(&self) -> Option<f64> {
        if self.len() < 2 {
            return None;
        }
        let mean = self.mean_fitness()?;
        let variance = self
            .individuals
            .iter()
            .map(|i| (i.fitness() - mean).powi(2))
            .sum::<f64>()
            / (self.len() - 1) as f64;
        Some(variance.sqrt())
    }
}

impl<I: Individual> Default for Population<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Individual> std::ops::Index<usize> for Population<I> {
    type Output = I;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl<I: Individual> IntoIterator for Population<I> {
    type Item = I;
    type IntoIter = std::vec::IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<I: Individual> FromIterator<I> for Population<I> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        Self::from_individuals(iter.into_iter().collect())
    }
}

/// Run `build` once per slot, each on an RNG seeded from `rng`
///
/// Seeds are drawn sequentially before any slot runs, which keeps the output
/// independent of scheduling. Results are in slot order; the first error wins.
pub(crate) fn construct_seeded<T, R, F>(
    count: usize,
    rng: &mut R,
    parallel: bool,
    build: F,
) -> EvoResult<Vec<T>>
where
    T: Send,
    R: Rng + ?Sized,
    F: Fn(&mut StdRng) -> EvoResult<T> + Sync,
{
    let seeds: Vec<u64> = (0..count).map(|_| rng.gen()).collect();
    let run = |seed: &u64| build(&mut StdRng::seed_from_u64(*seed));

    #[cfg(feature = "parallel")]
    {
        if parallel {
            return seeds.par_iter().map(run).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    {
        if parallel {
            tracing::trace!("parallel construction requested without the `parallel` feature");
        }
    }

    seeds.iter().map(run).collect()
}
