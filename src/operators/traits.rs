//! Operator traits
//!
//! This module defines the step traits the optimizer drives each generation.

use rand::Rng;

use crate::error::EvoResult;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Selection step
///
/// Culls a population in place down to its survivors.
pub trait SelectionStep<I: Individual>: Send + Sync {
    /// Reduce `population` to at most `survivors` individuals
    fn select(&self, population: &mut Population<I>, survivors: usize);
}

/// Regeneration step
///
/// Synthesizes replacement individuals from the survivors of selection.
pub trait RegenerationStep<I: Individual>: Send + Sync {
    /// Produce exactly `count` new individuals
    fn regenerate<R: Rng + ?Sized>(
        &self,
        survivors: &Population<I>,
        count: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<I>>;
}

/// Crossover operator trait
///
/// Combines two parents into one offspring. No implementation ships with the
/// crate; install one on [`MutationRegeneration`](crate::operators::regeneration::MutationRegeneration)
/// to give the non-mutation branch a meaning.
pub trait CrossoverOperator<I: Individual>: Send + Sync {
    /// Combine two parents into a new, fully evaluated individual
    fn crossover<R: Rng + ?Sized>(&self, parent1: &I, parent2: &I, rng: &mut R) -> EvoResult<I>;
}

/// Placeholder crossover type for regeneration without a crossover operator
///
/// Uninhabited: it can never be constructed, so it never runs.
#[derive(Clone, Copy, Debug)]
pub enum NoCrossover {}

impl<I: Individual> CrossoverOperator<I> for NoCrossover {
    fn crossover<R: Rng + ?Sized>(&self, _: &I, _: &I, _: &mut R) -> EvoResult<I> {
        match *self {}
    }
}
