//! Custom Individuals
//!
//! This example plugs a problem of its own into the optimizer: a point in
//! the plane maximizing a bumpy two-peak landscape. It shows the closure
//! factory, a hand-written progress reporter, and cooperative cancellation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use traffic_evo::prelude::*;

/// Fitness landscape with a low peak at (-2, -2) and a high one at (3, 1)
fn landscape(x: f64, y: f64) -> f64 {
    let peak = |cx: f64, cy: f64, h: f64| h * (-((x - cx).powi(2) + (y - cy).powi(2)) / 2.0).exp();
    peak(-2.0, -2.0, 1.0) + peak(3.0, 1.0, 2.0)
}

#[derive(Clone, Debug)]
struct Point {
    xy: [f64; 2],
    fitness: f64,
}

impl Point {
    fn new(xy: [f64; 2]) -> Self {
        Self {
            xy,
            fitness: landscape(xy[0], xy[1]),
        }
    }
}

impl Individual for Point {
    type Trajectory = [f64; 2];

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn mutate<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> EvoResult<Self> {
        let perturbation = UniformPerturbation::new(0.5, Bounds::symmetric(5.0));
        let genes = perturbation.perturb(&self.xy, rate, rng)?;
        Ok(Self::new([genes[0], genes[1]]))
    }

    fn trajectory(&self) -> &[f64; 2] {
        &self.xy
    }
}

/// Prints the best point and stops the run once it is close to the high peak
struct StopNearPeak {
    token: CancellationToken,
}

impl ProgressReporter<Point> for StopNearPeak {
    fn report_best(&mut self, generation: usize, best: &Point) -> Result<(), ReportError> {
        println!(
            "  gen {:>4}: ({:+.3}, {:+.3}) fitness {:.5}",
            generation, best.xy[0], best.xy[1], best.fitness
        );
        if best.fitness > 1.999 {
            self.token.cancel();
        }
        Ok(())
    }

    fn report_trajectories(
        &mut self,
        _generation: usize,
        _trajectories: &[&[f64; 2]],
    ) -> Result<(), ReportError> {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Custom Individual ===\n");

    let mut rng = StdRng::seed_from_u64(7);
    let token = CancellationToken::new();

    let factory = |rng: &mut StdRng| -> EvoResult<Point> {
        let bounds = Bounds::symmetric(5.0);
        Ok(Point::new([bounds.sample(rng), bounds.sample(rng)]))
    };

    let config = OptimizerConfig::default()
        .num_individuals(40)
        .num_after_culling(8)
        .mutation_parameter(0.5)
        .num_iterations(1_000)
        .report_intervals(25, 1_000);

    let mut optimizer = GeneticOptimizer::<Point, _>::builder(factory)
        .config(config)
        .cancellation(token.clone())
        .reporter(StopNearPeak { token })
        .build(&mut rng)?;

    match optimizer.optimize(&mut rng) {
        Ok(()) => println!("\nRan all generations"),
        Err(EvolutionError::Cancelled { generation }) => {
            println!("\nStopped before generation {}", generation)
        }
        Err(e) => return Err(e.into()),
    }

    if let Some(best) = optimizer.best() {
        println!("Best point: ({:.4}, {:.4})", best.xy[0], best.xy[1]);
    }
    println!("\n{}", optimizer.history().summary());

    Ok(())
}
