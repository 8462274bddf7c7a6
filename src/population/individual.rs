//! Individual capability contract
//!
//! The optimizer is generic over anything implementing [`Individual`]. An
//! individual is immutable once constructed: its fitness is computed exactly
//! once, at construction, and mutation always yields a new value.

use std::cmp::Ordering;
use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::EvoResult;

/// A candidate solution in the search population
pub trait Individual: Debug + Send + Sync + Sized {
    /// Per-individual log surfaced to trajectory reporters
    type Trajectory: Debug + Send + Sync;

    /// Fitness of this individual (higher is better)
    fn fitness(&self) -> f64;

    /// Produce a new individual whose genes are perturbed with per-gene
    /// probability `rate`
    ///
    /// Must not modify `self`. The returned individual is fully evaluated.
    fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> EvoResult<Self>;

    /// Log recorded while this individual was evaluated
    fn trajectory(&self) -> &Self::Trajectory;

    /// Check if this individual is strictly better than another
    fn is_better_than(&self, other: &Self) -> bool {
        compare_fitness(self.fitness(), other.fitness()) == Ordering::Greater
    }
}

/// Creates freshly initialized, fully evaluated individuals
///
/// Implemented for any `Fn(&mut StdRng) -> EvoResult<I> + Sync`.
pub trait IndividualFactory<I: Individual>: Sync {
    /// Build a new random individual
    fn create(&self, rng: &mut StdRng) -> EvoResult<I>;
}

impl<I, F> IndividualFactory<I> for F
where
    I: Individual,
    F: Fn(&mut StdRng) -> EvoResult<I> + Sync,
{
    fn create(&self, rng: &mut StdRng) -> EvoResult<I> {
        self(rng)
    }
}

/// Total ordering on fitness values where NaN ranks below everything
pub fn compare_fitness(a: f64, b: f64) -> Ordering {
    let key = |f: f64| if f.is_nan() { f64::NEG_INFINITY } else { f };
    key(a).total_cmp(&key(b))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Individual with a fixed fitness and a scalar gene
    #[derive(Clone, Debug, PartialEq)]
    pub struct Scored {
        pub id: usize,
        pub gene: f64,
        pub fitness: f64,
    }

    impl Scored {
        pub fn new(id: usize, fitness: f64) -> Self {
            Self {
                id,
                gene: fitness,
                fitness,
            }
        }
    }

    impl Individual for Scored {
        type Trajectory = usize;

        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> EvoResult<Self> {
            let gene = if rng.gen::<f64>() < rate {
                self.gene + rng.gen_range(-1.0..=1.0)
            } else {
                self.gene
            };
            Ok(Self {
                id: usize::MAX,
                gene,
                fitness: gene,
            })
        }

        fn trajectory(&self) -> &usize {
            &self.id
        }
    }
}
