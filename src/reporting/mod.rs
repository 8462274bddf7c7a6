//! Progress reporting
//!
//! The optimizer calls a [`ProgressReporter`] after each selection step. Reports
//! are side effects only; a failing reporter is logged and the run continues.

use std::io::Write;

use serde::Serialize;

use crate::error::ReportError;
use crate::population::individual::Individual;

/// Receives periodic snapshots of an optimization run
pub trait ProgressReporter<I: Individual> {
    /// Surface the current best individual
    fn report_best(&mut self, generation: usize, best: &I) -> Result<(), ReportError>;

    /// Surface the trajectory of every individual in the population
    fn report_trajectories(
        &mut self,
        generation: usize,
        trajectories: &[&I::Trajectory],
    ) -> Result<(), ReportError>;
}

/// Reporter that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl<I: Individual> ProgressReporter<I> for NullReporter {
    fn report_best(&mut self, _generation: usize, _best: &I) -> Result<(), ReportError> {
        Ok(())
    }

    fn report_trajectories(
        &mut self,
        _generation: usize,
        _trajectories: &[&I::Trajectory],
    ) -> Result<(), ReportError> {
        Ok(())
    }
}

/// Reporter that emits `tracing` events
///
/// The best individual is logged at info level, its full debug form and the
/// trajectory batch at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl<I: Individual> ProgressReporter<I> for TracingReporter {
    fn report_best(&mut self, generation: usize, best: &I) -> Result<(), ReportError> {
        tracing::info!(generation, fitness = best.fitness(), "Fittest individual");
        tracing::debug!(generation, individual = ?best, "Fittest individual details");
        Ok(())
    }

    fn report_trajectories(
        &mut self,
        generation: usize,
        trajectories: &[&I::Trajectory],
    ) -> Result<(), ReportError> {
        tracing::debug!(
            generation,
            count = trajectories.len(),
            "Population trajectories"
        );
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record<'a, T> {
    Best { generation: usize, fitness: f64 },
    Trajectories { generation: usize, trajectories: &'a [&'a T] },
}

/// Reporter that writes one JSON document per line
///
/// Intended as input for external plotting tools.
#[derive(Debug)]
pub struct JsonTrajectoryReporter<W: Write> {
    writer: W,
}

impl<W: Write> JsonTrajectoryReporter<W> {
    /// Create a reporter writing to `writer`
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record<T: Serialize>(&mut self, record: &Record<'_, T>) -> Result<(), ReportError> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<I, W> ProgressReporter<I> for JsonTrajectoryReporter<W>
where
    I: Individual,
    I::Trajectory: Serialize,
    W: Write,
{
    fn report_best(&mut self, generation: usize, best: &I) -> Result<(), ReportError> {
        self.write_record::<I::Trajectory>(&Record::Best {
            generation,
            fitness: best.fitness(),
        })
    }

    fn report_trajectories(
        &mut self,
        generation: usize,
        trajectories: &[&I::Trajectory],
    ) -> Result<(), ReportError> {
        self.write_record(&Record::Trajectories {
            generation,
            trajectories,
        })
    }
}
