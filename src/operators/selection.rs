//! Selection operators
//!
//! Survival is decided by a hard cutoff on fitness rank.

use crate::operators::traits::SelectionStep;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Truncation selection
///
/// Sorts by descending fitness (stable) and keeps the first `survivors`.
/// No fitness-proportionate sampling.
#[derive(Clone, Copy, Debug, Default)]
pub struct TruncationSelection;

impl TruncationSelection {
    /// Create a new truncation selection
    pub fn new() -> Self {
        Self
    }
}

impl<I: Individual> SelectionStep<I> for TruncationSelection {
    fn select(&self, population: &mut Population<I>, survivors: usize) {
        population.truncate_to_best(survivors);
    }
}
