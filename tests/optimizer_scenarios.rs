//! End-to-end runs of the optimizer on the traffic light problem

use rand::rngs::StdRng;
use rand::SeedableRng;
use traffic_evo::prelude::*;
use traffic_evo::traffic::{MAX_ACC, MIN_ACC, NUM_STEPS};

fn small_config() -> OptimizerConfig {
    OptimizerConfig::default()
        .num_individuals(20)
        .num_after_culling(5)
        .num_iterations(40)
        .report_intervals(10, 20)
}

fn factory() -> StrategyFactory {
    StrategyFactory::new(Approach::new(TrafficLight::default())).unwrap()
}

#[test]
fn test_traffic_run_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory())
        .config(small_config())
        .reporter(NullReporter)
        .build(&mut rng)
        .unwrap();
    optimizer.optimize(&mut rng).unwrap();

    assert_eq!(optimizer.generation(), 40);
    assert_eq!(optimizer.population().len(), 20);
    for strategy in optimizer.population().iter() {
        assert_eq!(strategy.profile().len(), NUM_STEPS);
        assert!(strategy
            .profile()
            .as_slice()
            .iter()
            .all(|a| (MIN_ACC..=MAX_ACC).contains(a)));
    }

    let best = optimizer.history().best_fitness_history();
    assert_eq!(best.len(), 40);
    assert!(best.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_json_reporter_writes_lines() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory())
        .config(small_config())
        .reporter(JsonTrajectoryReporter::new(Vec::new()))
        .build(&mut rng)
        .unwrap();
    optimizer.optimize(&mut rng).unwrap();

    let output = String::from_utf8(optimizer.reporter().get_ref().clone()).unwrap();
    let lines: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // best at 0, 10, 20, 30; trajectories at 0, 20
    let best = lines.iter().filter(|v| v["kind"] == "best").count();
    let trajectories: Vec<_> = lines
        .iter()
        .filter(|v| v["kind"] == "trajectories")
        .collect();
    assert_eq!(best, 4);
    assert_eq!(trajectories.len(), 2);
    assert_eq!(trajectories[0]["trajectories"].as_array().unwrap().len(), 5);
    assert_eq!(
        trajectories[0]["trajectories"][0]["entries"]
            .as_array()
            .unwrap()
            .len(),
        NUM_STEPS
    );
}

#[test]
fn test_cancellation_from_token() {
    let mut rng = StdRng::seed_from_u64(1);
    let token = CancellationToken::new();
    let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory())
        .config(small_config())
        .cancellation(token.clone())
        .reporter(NullReporter)
        .build(&mut rng)
        .unwrap();

    optimizer.iterate(&mut rng).unwrap();
    token.cancel();
    let result = optimizer.optimize(&mut rng);
    assert!(matches!(result, Err(EvolutionError::Cancelled { generation: 1 })));
    assert_eq!(optimizer.population().len(), 20);
}

#[test]
fn test_config_from_json_drives_run() {
    let config = OptimizerConfig::from_json(
        r#"{"num_individuals": 12, "num_after_culling": 3, "num_iterations": 5}"#,
    )
    .unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let best = traffic_evo::traffic::optimize_with(TrafficLight::default(), config, &mut rng).unwrap();
    assert!(best.fitness().is_finite());
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let run = |parallel: bool| {
        let mut rng = StdRng::seed_from_u64(99);
        let mut optimizer = GeneticOptimizer::<AccelerationStrategy, _>::builder(factory())
            .config(small_config().parallel(parallel))
            .reporter(NullReporter)
            .build(&mut rng)
            .unwrap();
        optimizer.optimize(&mut rng).unwrap();
        optimizer.population().fitnesses()
    };
    assert_eq!(run(false), run(true));
}
