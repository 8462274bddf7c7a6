//! Trajectory scoring

use serde::{Deserialize, Serialize};

use crate::traffic::light::TrafficLight;
use crate::traffic::simulation::TrajectoryLog;

/// Maps a trajectory to a fitness, higher is better
pub trait Scorer: Send + Sync {
    fn score(&self, log: &TrajectoryLog, light: &TrafficLight) -> f64;
}

/// Rewards progress, punishes running the red light and harsh driving
///
/// `score = final_position - red_light_penalty * ran_red - comfort_weight * mean(a²)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceScore {
    /// Subtracted once when the stop line is crossed on red
    pub red_light_penalty: f64,
    /// Weight of the mean squared acceleration
    pub comfort_weight: f64,
}

impl PerformanceScore {
    /// Create a scorer with the given penalty and comfort weight
    pub fn new(red_light_penalty: f64, comfort_weight: f64) -> Self {
        Self {
            red_light_penalty,
            comfort_weight,
        }
    }
}

impl Default for PerformanceScore {
    fn default() -> Self {
        Self::new(1000.0, 0.1)
    }
}

impl Scorer for PerformanceScore {
    fn score(&self, log: &TrajectoryLog, _light: &TrafficLight) -> f64 {
        let penalty = if log.ran_red_light() {
            self.red_light_penalty
        } else {
            0.0
        };
        log.final_position() - penalty - self.comfort_weight * log.mean_squared_acceleration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::simulation::{KinematicSimulator, ProfileDriver, Simulator};
    use approx::assert_relative_eq;

    fn run(profile: &[f64], light: &TrafficLight) -> TrajectoryLog {
        KinematicSimulator::new(0.1)
            .simulate(&ProfileDriver::new(profile), light)
            .unwrap()
    }

    #[test]
    fn test_score_components() {
        let light = TrafficLight::new(500.0, 4.0, 6.0, 10.0);
        let log = run(&[2.0; 100], &light);
        let score = PerformanceScore::new(1000.0, 0.5).score(&log, &light);
        assert_relative_eq!(score, 100.0 - 0.5 * 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_red_light_penalty() {
        let light = TrafficLight::new(50.0, 8.0, 2.0, 10.0);
        let log = run(&[2.0; 100], &light);
        assert!(log.ran_red_light());
        let score = PerformanceScore::default().score(&log, &light);
        assert!(score < 0.0);
    }

    #[test]
    fn test_waiting_beats_running_the_red() {
        let light = TrafficLight::new(50.0, 8.0, 2.0, 10.0);
        let scorer = PerformanceScore::default();
        let rushed = scorer.score(&run(&[2.0; 100], &light), &light);
        let patient = scorer.score(&run(&[0.5; 100], &light), &light);
        assert!(patient > rushed);
    }
}
