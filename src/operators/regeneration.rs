//! Regeneration operators
//!
//! Refill a culled population by breeding from its survivors.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::OptimizerConfig;
use crate::error::{EvoResult, EvolutionError};
use crate::operators::traits::{CrossoverOperator, NoCrossover, RegenerationStep};
use crate::population::individual::Individual;
use crate::population::population::{construct_seeded, Population};

/// Mutation-driven regeneration
///
/// Each replacement is drawn independently: with probability
/// `proportion_generated_through_mutation` a uniformly chosen survivor (with
/// replacement) is mutated at `mutation_parameter`. Otherwise the installed
/// crossover operator combines two uniformly chosen survivors; without one
/// the slot is filled by mutation as well.
#[derive(Clone, Debug)]
pub struct MutationRegeneration<C = NoCrossover> {
    /// Probability that a slot is filled through mutation
    pub proportion_generated_through_mutation: f64,
    /// Per-gene mutation probability passed to `Individual::mutate`
    pub mutation_parameter: f64,
    /// Build slots on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
    crossover: Option<C>,
}

impl MutationRegeneration<NoCrossover> {
    /// Create a mutation-only regeneration step
    pub fn new(proportion_generated_through_mutation: f64, mutation_parameter: f64) -> Self {
        Self {
            proportion_generated_through_mutation,
            mutation_parameter,
            parallel: false,
            crossover: None,
        }
    }
}

impl<C> MutationRegeneration<C> {
    /// Create a regeneration step from an optimizer configuration
    pub fn from_config(config: &OptimizerConfig, crossover: Option<C>) -> Self {
        Self {
            proportion_generated_through_mutation: config.proportion_generated_through_mutation,
            mutation_parameter: config.mutation_parameter,
            parallel: config.parallel,
            crossover,
        }
    }

    /// Install a crossover operator for the non-mutation branch
    pub fn with_crossover<NewC>(self, crossover: NewC) -> MutationRegeneration<NewC> {
        MutationRegeneration {
            proportion_generated_through_mutation: self.proportion_generated_through_mutation,
            mutation_parameter: self.mutation_parameter,
            parallel: self.parallel,
            crossover: Some(crossover),
        }
    }

    /// Enable or disable parallel slot construction
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Check whether a crossover operator is installed
    pub fn has_crossover(&self) -> bool {
        self.crossover.is_some()
    }

    fn fill_slot<I>(&self, survivors: &[I], rng: &mut StdRng) -> EvoResult<I>
    where
        I: Individual,
        C: CrossoverOperator<I>,
    {
        let r: f64 = rng.gen();
        let parent = survivors.choose(rng).ok_or(EvolutionError::EmptyPopulation)?;

        if r < self.proportion_generated_through_mutation {
            return parent.mutate(self.mutation_parameter, rng);
        }

        match &self.crossover {
            Some(crossover) => {
                let other = survivors.choose(rng).ok_or(EvolutionError::EmptyPopulation)?;
                crossover.crossover(parent, other, rng)
            }
            None => {
                tracing::trace!("no crossover operator installed, falling back to mutation");
                parent.mutate(self.mutation_parameter, rng)
            }
        }
    }
}

impl<I, C> RegenerationStep<I> for MutationRegeneration<C>
where
    I: Individual,
    C: CrossoverOperator<I>,
{
    fn regenerate<R: Rng + ?Sized>(
        &self,
        survivors: &Population<I>,
        count: usize,
        rng: &mut R,
    ) -> EvoResult<Vec<I>> {
        if survivors.is_empty() && count > 0 {
            return Err(EvolutionError::EmptyPopulation);
        }
        let parents = survivors.individuals();
        construct_seeded(count, rng, self.parallel, |slot_rng| {
            self.fill_slot(parents, slot_rng)
        })
    }
}
