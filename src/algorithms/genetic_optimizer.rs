//! Genetic optimizer
//!
//! This module implements the generational loop: rank, cull to the elite,
//! report, and refill by mutating survivors, for a fixed number of
//! generations.

use std::marker::PhantomData;
use std::time::Instant;

use rand::Rng;
use tracing::instrument;

use crate::algorithms::cancellation::CancellationToken;
use crate::config::OptimizerConfig;
use crate::diagnostics::{GenerationStats, OptimizationHistory};
use crate::error::{EvoResult, EvolutionError};
use crate::operators::regeneration::MutationRegeneration;
use crate::operators::selection::TruncationSelection;
use crate::operators::traits::{CrossoverOperator, NoCrossover, RegenerationStep, SelectionStep};
use crate::population::individual::{Individual, IndividualFactory};
use crate::population::population::Population;
use crate::reporting::{ProgressReporter, TracingReporter};

/// Builder for GeneticOptimizer
pub struct GeneticOptimizerBuilder<
    I,
    Fac,
    Rep = TracingReporter,
    S = TruncationSelection,
    C = NoCrossover,
> {
    config: OptimizerConfig,
    factory: Fac,
    reporter: Rep,
    selection: S,
    crossover: Option<C>,
    cancellation: CancellationToken,
    _phantom: PhantomData<fn() -> I>,
}

impl<I, Fac> GeneticOptimizerBuilder<I, Fac>
where
    I: Individual,
    Fac: IndividualFactory<I>,
{
    /// Create a new builder with default configuration
    pub fn new(factory: Fac) -> Self {
        Self {
            config: OptimizerConfig::default(),
            factory,
            reporter: TracingReporter,
            selection: TruncationSelection,
            crossover: None,
            cancellation: CancellationToken::new(),
            _phantom: PhantomData,
        }
    }
}

impl<I, Fac, Rep, S, C> GeneticOptimizerBuilder<I, Fac, Rep, S, C> {
    /// Set the configuration
    pub fn config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cancellation token
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set the progress reporter
    pub fn reporter<NewRep>(self, reporter: NewRep) -> GeneticOptimizerBuilder<I, Fac, NewRep, S, C> {
        GeneticOptimizerBuilder {
            config: self.config,
            factory: self.factory,
            reporter,
            selection: self.selection,
            crossover: self.crossover,
            cancellation: self.cancellation,
            _phantom: PhantomData,
        }
    }

    /// Set the selection step
    pub fn selection<NewS>(self, selection: NewS) -> GeneticOptimizerBuilder<I, Fac, Rep, NewS, C> {
        GeneticOptimizerBuilder {
            config: self.config,
            factory: self.factory,
            reporter: self.reporter,
            selection,
            crossover: self.crossover,
            cancellation: self.cancellation,
            _phantom: PhantomData,
        }
    }

    /// Install a crossover operator for the non-mutation regeneration branch
    pub fn crossover<NewC>(self, crossover: NewC) -> GeneticOptimizerBuilder<I, Fac, Rep, S, NewC> {
        GeneticOptimizerBuilder {
            config: self.config,
            factory: self.factory,
            reporter: self.reporter,
            selection: self.selection,
            crossover: Some(crossover),
            cancellation: self.cancellation,
            _phantom: PhantomData,
        }
    }
}

impl<I, Fac, Rep, S, C> GeneticOptimizerBuilder<I, Fac, Rep, S, C>
where
    I: Individual,
    Fac: IndividualFactory<I>,
    Rep: ProgressReporter<I>,
    S: SelectionStep<I>,
    C: CrossoverOperator<I>,
{
    /// Validate the configuration and construct the initial population
    #[instrument(level = "debug", skip_all, fields(num_individuals = self.config.num_individuals))]
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> EvoResult<GeneticOptimizer<I, Fac, Rep, S, C>> {
        self.config.validate()?;

        let population = Population::generate(
            self.config.num_individuals,
            &self.factory,
            rng,
            self.config.parallel,
        )?;
        tracing::debug!(
            best_fitness = population.best().map(|i| i.fitness()),
            "Initial population constructed"
        );

        let regeneration = MutationRegeneration::from_config(&self.config, self.crossover);

        Ok(GeneticOptimizer {
            config: self.config,
            factory: self.factory,
            reporter: self.reporter,
            selection: self.selection,
            regeneration,
            population,
            generation: 0,
            history: OptimizationHistory::new(),
            cancellation: self.cancellation,
        })
    }
}

/// Generational genetic optimizer
///
/// Runs a fixed number of generations of truncation selection followed by
/// mutation-driven regeneration. The final population stays available for
/// inspection after [`GeneticOptimizer::optimize`] returns.
pub struct GeneticOptimizer<I, Fac, Rep = TracingReporter, S = TruncationSelection, C = NoCrossover>
where
    I: Individual,
{
    config: OptimizerConfig,
    factory: Fac,
    reporter: Rep,
    selection: S,
    regeneration: MutationRegeneration<C>,
    population: Population<I>,
    generation: usize,
    history: OptimizationHistory,
    cancellation: CancellationToken,
}

impl<I, Fac> GeneticOptimizer<I, Fac>
where
    I: Individual,
    Fac: IndividualFactory<I>,
{
    /// Create a builder for GeneticOptimizer
    pub fn builder(factory: Fac) -> GeneticOptimizerBuilder<I, Fac> {
        GeneticOptimizerBuilder::new(factory)
    }

    /// Build an optimizer with default operators and the given configuration
    pub fn new<R: Rng + ?Sized>(factory: Fac, config: OptimizerConfig, rng: &mut R) -> EvoResult<Self> {
        Self::builder(factory).config(config).build(rng)
    }
}

impl<I, Fac, Rep, S, C> GeneticOptimizer<I, Fac, Rep, S, C>
where
    I: Individual,
    Fac: IndividualFactory<I>,
    Rep: ProgressReporter<I>,
    S: SelectionStep<I>,
    C: CrossoverOperator<I>,
{
    /// Run `num_iterations` generations
    ///
    /// Stops early only when the cancellation token is set, which is checked
    /// before every generation.
    #[instrument(level = "debug", skip_all, fields(generations = self.config.num_iterations))]
    pub fn optimize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EvoResult<()> {
        let start_time = Instant::now();

        for _ in 0..self.config.num_iterations {
            if self.cancellation.is_cancelled() {
                tracing::info!(generation = self.generation, "Optimization cancelled");
                self.history.add_runtime(start_time.elapsed());
                return Err(EvolutionError::Cancelled {
                    generation: self.generation,
                });
            }
            self.iterate(rng)?;
        }

        self.history.add_runtime(start_time.elapsed());
        tracing::info!(
            generations = self.generation,
            best_fitness = self.best().map(|i| i.fitness()),
            "Optimization finished"
        );
        Ok(())
    }

    /// Run a single generation
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> EvoResult<()> {
        let gen_start = Instant::now();
        let expected = self.config.num_individuals;
        self.check_size(expected)?;

        self.selection
            .select(&mut self.population, self.config.num_after_culling);
        let stats = GenerationStats::from_survivors(&self.population, self.generation);

        self.report_progress();

        let num_to_replenish = self.config.num_to_replenish();
        let offspring = self
            .regeneration
            .regenerate(&self.population, num_to_replenish, rng)?;
        self.population.extend(offspring);

        self.check_size(expected)?;

        tracing::trace!(
            generation = self.generation,
            best_fitness = stats.best_fitness,
            elite_threshold = stats.elite_threshold,
            "Generation complete"
        );
        self.history.record(
            stats
                .with_population(&self.population)
                .with_elapsed(gen_start.elapsed()),
        );
        self.generation += 1;
        Ok(())
    }

    fn check_size(&self, expected: usize) -> EvoResult<()> {
        let actual = self.population.len();
        debug_assert_eq!(actual, expected, "population size invariant violated");
        if actual != expected {
            tracing::error!(expected, actual, "Population size invariant violated");
            return Err(EvolutionError::PopulationSizeInvariant { expected, actual });
        }
        Ok(())
    }

    fn report_progress(&mut self) {
        let generation = self.generation;

        if generation % self.config.best_report_interval == 0 {
            if let Some(best) = self.population.best() {
                if let Err(err) = self.reporter.report_best(generation, best) {
                    tracing::warn!(generation, error = %err, "Failed to report best individual");
                }
            }
        }

        if generation % self.config.trajectory_report_interval == 0 {
            let trajectories = self.population.trajectories();
            if let Err(err) = self.reporter.report_trajectories(generation, &trajectories) {
                tracing::warn!(generation, error = %err, "Failed to report trajectories");
            }
        }
    }
}

impl<I, Fac, Rep, S, C> GeneticOptimizer<I, Fac, Rep, S, C>
where
    I: Individual,
{
    /// Index of the next generation to run
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// The live population
    pub fn population(&self) -> &Population<I> {
        &self.population
    }

    /// Take the population out of the optimizer
    pub fn into_population(self) -> Population<I> {
        self.population
    }

    /// The best individual of the live population
    pub fn best(&self) -> Option<&I> {
        self.population.best()
    }

    /// The run configuration
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The factory used for the initial population
    pub fn factory(&self) -> &Fac {
        &self.factory
    }

    /// The progress reporter
    pub fn reporter(&self) -> &Rep {
        &self.reporter
    }

    /// Per-generation statistics recorded so far
    pub fn history(&self) -> &OptimizationHistory {
        &self.history
    }

    /// A handle that cancels this optimizer between generations
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::population::individual::testing::Scored;
    use crate::reporting::NullReporter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Factory handing out consecutive ids with fitness equal to the id
    struct Indexed(AtomicUsize);

    impl Indexed {
        fn new() -> Self {
            Self(AtomicUsize::new(0))
        }
    }

    impl IndividualFactory<Scored> for Indexed {
        fn create(&self, _rng: &mut StdRng) -> EvoResult<Scored> {
            let id = self.0.fetch_add(1, Ordering::Relaxed);
            Ok(Scored::new(id, id as f64))
        }
    }

    #[derive(Default)]
    struct Recorder {
        best: Vec<(usize, f64)>,
        trajectories: Vec<(usize, usize)>,
        fail: bool,
    }

    impl ProgressReporter<Scored> for Recorder {
        fn report_best(&mut self, generation: usize, best: &Scored) -> Result<(), ReportError> {
            self.best.push((generation, best.fitness));
            if self.fail {
                return Err(ReportError::Serialization("disk full".to_string()));
            }
            Ok(())
        }

        fn report_trajectories(
            &mut self,
            generation: usize,
            trajectories: &[&usize],
        ) -> Result<(), ReportError> {
            self.trajectories.push((generation, trajectories.len()));
            if self.fail {
                return Err(ReportError::Serialization("disk full".to_string()));
            }
            Ok(())
        }
    }

    /// Selection that culls one individual too many
    struct Overzealous;

    impl SelectionStep<Scored> for Overzealous {
        fn select(&self, population: &mut Population<Scored>, survivors: usize) {
            population.truncate_to_best(survivors - 1);
        }
    }

    fn small_config() -> OptimizerConfig {
        OptimizerConfig::new()
            .num_individuals(20)
            .num_after_culling(5)
            .num_iterations(50)
    }

    #[test]
    fn test_build_constructs_initial_population() {
        let mut rng = StdRng::seed_from_u64(1);
        let opt = GeneticOptimizer::<Scored, _>::new(Indexed::new(), small_config(), &mut rng).unwrap();
        assert_eq!(opt.population().len(), 20);
        assert_eq!(opt.generation(), 0);
        assert_eq!(opt.best().unwrap().fitness, 19.0);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = small_config().num_after_culling(20);
        let result = GeneticOptimizer::<Scored, _>::new(Indexed::new(), config, &mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::Configuration(
                crate::error::ConfigError::CullingTooLarge { .. }
            ))
        ));
    }

    #[test]
    fn test_single_iteration_keeps_top_five() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();

        opt.iterate(&mut rng).unwrap();

        let pop = opt.population();
        assert_eq!(pop.len(), 20);
        let elite: Vec<usize> = pop.iter().take(5).map(|i| i.id).collect();
        assert_eq!(elite, vec![19, 18, 17, 16, 15]);
        assert!(pop.iter().skip(5).all(|i| i.id == usize::MAX));
        assert_eq!(opt.generation(), 1);
    }

    #[test]
    fn test_population_size_holds_every_generation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();

        for _ in 0..30 {
            assert_eq!(opt.population().len(), 20);
            opt.iterate(&mut rng).unwrap();
            assert_eq!(opt.population().len(), 20);
        }
    }

    #[test]
    fn test_elite_is_top_k_of_previous_pool() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();

        for _ in 0..20 {
            let mut expected = opt.population().fitnesses();
            expected.sort_by(|a, b| b.total_cmp(a));
            expected.truncate(5);

            opt.iterate(&mut rng).unwrap();

            let elite: Vec<f64> = opt.population().iter().take(5).map(|i| i.fitness).collect();
            assert_eq!(elite, expected);
        }
    }

    #[test]
    fn test_elite_threshold_never_drops() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();
        opt.optimize(&mut rng).unwrap();

        let thresholds = opt.history().elite_threshold_history();
        assert_eq!(thresholds.len(), 50);
        for pair in thresholds.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_optimize_runs_exact_generation_count() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();
        opt.optimize(&mut rng).unwrap();

        assert_eq!(opt.generation(), 50);
        assert_eq!(opt.history().num_generations(), 50);
        assert_eq!(opt.population().len(), 20);
        // only the initial population goes through the factory
        assert_eq!(opt.factory().0.load(Ordering::Relaxed), 20);
    }

    #[test]
    fn test_reporter_called_on_intervals() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config().num_iterations(25).report_intervals(10, 20))
            .reporter(Recorder::default())
            .build(&mut rng)
            .unwrap();
        opt.optimize(&mut rng).unwrap();

        let best_generations: Vec<usize> = opt.reporter().best.iter().map(|b| b.0).collect();
        assert_eq!(best_generations, vec![0, 10, 20]);
        assert_eq!(opt.reporter().best[0].1, 19.0);
        // trajectories cover the culled population
        assert_eq!(opt.reporter().trajectories, vec![(0, 5), (20, 5)]);
    }

    #[test]
    fn test_failing_reporter_does_not_abort() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config().num_iterations(5).report_intervals(1, 1))
            .reporter(Recorder {
                fail: true,
                ..Recorder::default()
            })
            .build(&mut rng)
            .unwrap();

        assert!(opt.optimize(&mut rng).is_ok());
        assert_eq!(opt.reporter().best.len(), 5);
        assert_eq!(opt.generation(), 5);
    }

    #[test]
    fn test_cancellation_stops_between_generations() {
        let mut rng = StdRng::seed_from_u64(9);
        let token = CancellationToken::new();
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .cancellation(token.clone())
            .build(&mut rng)
            .unwrap();

        opt.iterate(&mut rng).unwrap();
        opt.iterate(&mut rng).unwrap();
        token.cancel();

        let result = opt.optimize(&mut rng);
        assert!(matches!(result, Err(EvolutionError::Cancelled { generation: 2 })));
        assert_eq!(opt.population().len(), 20);
        assert!(opt.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_factory_error_propagates() {
        let mut rng = StdRng::seed_from_u64(10);
        let factory = |_: &mut StdRng| -> EvoResult<Scored> {
            Err(EvolutionError::Individual("simulation diverged".to_string()))
        };
        let result = GeneticOptimizer::<Scored, _>::new(factory, small_config(), &mut rng);
        assert!(matches!(result, Err(EvolutionError::Individual(_))));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
                .config(small_config().num_iterations(10))
                .reporter(NullReporter)
                .build(&mut rng)
                .unwrap();
            opt.optimize(&mut rng).unwrap();
            opt.population().fitnesses()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "population size invariant violated"))]
    fn test_size_invariant_violation_is_reported() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut opt = GeneticOptimizer::<Scored, _>::builder(Indexed::new())
            .config(small_config())
            .reporter(NullReporter)
            .selection(Overzealous)
            .build(&mut rng)
            .unwrap();

        let result = opt.iterate(&mut rng);
        assert!(matches!(
            result,
            Err(EvolutionError::PopulationSizeInvariant {
                expected: 20,
                actual: 19
            })
        ));
    }
}
