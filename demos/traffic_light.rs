//! Traffic Light Approach
//!
//! This example searches for an acceleration profile that carries a vehicle
//! as far as possible in ten seconds without running a red light.
//!
//! The light is 50 m ahead and stays red for the first four seconds, so
//! flooring it from the start would cross on red.
//!
//! Run with `RUST_LOG=debug` for per-generation trajectory counts.

use std::fs::File;
use std::io::BufWriter;

use rand::rngs::StdRng;
use rand::SeedableRng;
use traffic_evo::prelude::*;
use traffic_evo::traffic::DT;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Traffic Light Approach ===\n");

    let mut rng = StdRng::seed_from_u64(42);
    let light = TrafficLight::default();
    let config = OptimizerConfig::default()
        .num_individuals(100)
        .num_after_culling(10)
        .num_iterations(2_000)
        .report_intervals(100, 500);

    // Trajectories go to a JSON-lines file for plotting
    let writer = BufWriter::new(File::create("traffic_light_trajectories.jsonl")?);
    let factory = StrategyFactory::new(Approach::new(light))?;
    let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory)
        .config(config)
        .reporter(JsonTrajectoryReporter::new(writer))
        .build(&mut rng)?;
    optimizer.optimize(&mut rng)?;

    let best = optimizer.best().ok_or(EvolutionError::EmptyPopulation)?;
    let log = best.trajectory();

    println!("Optimization complete!");
    println!("  Best: {}", best);
    println!("  Final position: {:.2} m", log.final_position());
    match log.crossing {
        Some(crossing) => println!(
            "  Crossed the stop line at {:.2} s on {:?}",
            crossing.time, crossing.light
        ),
        None => println!("  Never reached the stop line"),
    }

    println!("\nProfile (every second):");
    for (step, acceleration) in best.profile().as_slice().iter().enumerate().step_by(10) {
        println!("  t = {:>4.1} s  a = {:+.3} m/s²", step as f64 * DT, acceleration);
    }

    println!("\n{}", optimizer.history().summary());

    Ok(())
}
