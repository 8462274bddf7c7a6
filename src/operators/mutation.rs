//! Mutation operators
//!
//! Gene-level perturbation used by vector-valued individuals.

use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Uniform};

use crate::error::{ConfigError, EvoResult};
use crate::genome::bounds::Bounds;

/// Bounded uniform perturbation
///
/// Each gene is perturbed with probability `rate` by a value drawn uniformly
/// from `[-max_change, max_change]`; every result is clamped to `bounds`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformPerturbation {
    /// Largest absolute change applied to a single gene
    pub max_change: f64,
    /// Range every gene is clamped to
    pub bounds: Bounds,
}

impl UniformPerturbation {
    /// Create a new perturbation operator
    pub fn new(max_change: f64, bounds: Bounds) -> Self {
        assert!(
            max_change.is_finite() && max_change >= 0.0,
            "Maximum change must be finite and non-negative, got {}",
            max_change
        );
        Self { max_change, bounds }
    }

    /// Return a perturbed copy of `genes`
    ///
    /// With `rate == 0.0` the copy is bit-identical to the input.
    pub fn perturb<R: Rng + ?Sized>(&self, genes: &[f64], rate: f64, rng: &mut R) -> EvoResult<Vec<f64>> {
        let do_change = Bernoulli::new(rate).map_err(|_| ConfigError::ProbabilityOutOfRange {
            name: "mutation_parameter",
            value: rate,
        })?;
        let change = Uniform::new_inclusive(-self.max_change, self.max_change);

        Ok(genes
            .iter()
            .map(|&gene| {
                if do_change.sample(rng) {
                    self.shift(gene, change.sample(rng))
                } else {
                    gene
                }
            })
            .collect())
    }

    /// Apply a single change to a gene, clamping the change and the result
    pub fn shift(&self, gene: f64, delta: f64) -> f64 {
        let delta = delta.clamp(-self.max_change, self.max_change);
        self.bounds.clamp(gene + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvolutionError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn operator() -> UniformPerturbation {
        UniformPerturbation::new(1.0, Bounds::new(-4.0, 3.0))
    }

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(42);
        let genes = vec![0.1, -2.5, 2.9, 0.0, 1.75];
        let out = operator().perturb(&genes, 0.0, &mut rng).unwrap();
        assert_eq!(out, genes);
    }

    #[test]
    fn test_full_rate_changes_every_gene() {
        let mut rng = StdRng::seed_from_u64(42);
        let genes = vec![0.0; 50];
        let out = operator().perturb(&genes, 1.0, &mut rng).unwrap();
        assert!(out.iter().zip(&genes).all(|(a, b)| a != b));
    }

    #[test]
    fn test_changes_are_bounded_by_max_change() {
        let mut rng = StdRng::seed_from_u64(8);
        let genes = vec![0.0; 200];
        let out = operator().perturb(&genes, 1.0, &mut rng).unwrap();
        assert!(out.iter().all(|g| g.abs() <= 1.0));
    }

    #[test]
    fn test_expected_number_of_changes() {
        let mut rng = StdRng::seed_from_u64(1234);
        let genes = vec![0.0; 100];
        let trials = 200;
        let mut changed = 0usize;
        for _ in 0..trials {
            let out = operator().perturb(&genes, 0.3, &mut rng).unwrap();
            changed += out.iter().filter(|g| **g != 0.0).count();
        }
        let mean = changed as f64 / trials as f64;
        approx::assert_abs_diff_eq!(mean, 30.0, epsilon = 2.0);
    }

    #[test]
    fn test_shift_saturates_at_bounds() {
        let op = operator();
        assert_eq!(op.shift(2.99, 1.0), 3.0);
        assert_eq!(op.shift(2.99, 50.0), 3.0);
        assert_eq!(op.shift(-3.5, -1.0), -4.0);
        assert_eq!(op.shift(0.0, 5.0), 1.0);
    }

    #[test]
    #[should_panic(expected = "Maximum change must be finite")]
    fn test_infinite_max_change_rejected() {
        UniformPerturbation::new(f64::INFINITY, Bounds::new(-4.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "Maximum change must be finite")]
    fn test_negative_max_change_rejected() {
        UniformPerturbation::new(-1.0, Bounds::new(-4.0, 3.0));
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = operator().perturb(&[0.0], 1.5, &mut rng);
        assert!(matches!(result, Err(EvolutionError::Configuration(_))));
    }
}
