//! Drives `ElevatorCore::step()` in a loop and gathers loop statistics.

use std::time::Instant;

use elevator_traits::{Inputs, Panel, Terminal};

use crate::controller::ElevatorCore;
use crate::error::Result;
use crate::status::StepReport;
use crate::util::{as_micros_u64, idle_duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Idle time handed back to the clock after every iteration (µs).
    pub idle_us: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { idle_us: 500 }
    }
}

/// Wall-clock cost of the iterations run so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub iterations: u64,
    pub max_step_us: u64,
    pub total_step_us: u64,
}

impl LoopStats {
    fn record(&mut self, step_us: u64) {
        self.iterations += 1;
        self.max_step_us = self.max_step_us.max(step_us);
        self.total_step_us = self.total_step_us.saturating_add(step_us);
    }

    pub fn mean_step_us(&self) -> u64 {
        self.total_step_us.checked_div(self.iterations).unwrap_or(0)
    }
}

/// Step `core` until `should_stop` returns true, reporting every iteration.
///
/// `should_stop` is consulted before each iteration. The controller must
/// already have been reset with `begin()`. Any step error ends the run.
pub fn run<I, P, T, S, F>(
    core: &mut ElevatorCore<I, P, T>,
    opts: RunOptions,
    mut should_stop: S,
    mut on_report: F,
) -> Result<LoopStats>
where
    I: Inputs,
    P: Panel,
    T: Terminal,
    S: FnMut(&ElevatorCore<I, P, T>) -> bool,
    F: FnMut(&StepReport),
{
    let idle = idle_duration(opts.idle_us);
    let mut stats = LoopStats::default();
    tracing::info!(idle_us = opts.idle_us, "control loop start");

    while !should_stop(core) {
        let t0 = Instant::now();
        let report = core.step()?;
        stats.record(as_micros_u64(t0.elapsed()));
        on_report(&report);
        core.clock().sleep(idle);
    }

    tracing::info!(
        iterations = stats.iterations,
        max_step_us = stats.max_step_us,
        mean_step_us = stats.mean_step_us(),
        trips = core.trips_completed(),
        "control loop stop"
    );
    Ok(stats)
}

/// Step forever. Returns only when a step fails.
pub fn run_forever<I: Inputs, P: Panel, T: Terminal>(
    core: &mut ElevatorCore<I, P, T>,
    opts: RunOptions,
) -> Result<()> {
    run(core, opts, |_| false, |_| {}).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_no_iterations_is_zero() {
        let s = LoopStats::default();
        assert_eq!(s.mean_step_us(), 0);
    }

    #[test]
    fn stats_track_max_and_mean() {
        let mut s = LoopStats::default();
        s.record(10);
        s.record(30);
        assert_eq!(s.iterations, 2);
        assert_eq!(s.max_step_us, 30);
        assert_eq!(s.mean_step_us(), 20);
    }
}
