//! Command bodies: live run, scripted replay and self-check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use elevator_config::{Config, ScriptAction, ScriptStep};
use elevator_core::error::Result;
use elevator_core::runner::{self, LoopStats, RunOptions};
use elevator_core::{
    Admission, Arrival, DisplayCfg, DoorCfg, Elevator, Floor, MotionCfg, StepReport, TripCounters,
    build_elevator,
};
use elevator_hardware::keys::KeyReader;
use elevator_hardware::{
    AnsiTerminal, FramePanel, InputEvent, ScriptedInputs, TerminalInputs, TextGrid, TimedEvent,
};
use elevator_traits::{Clock, ManualClock};
use eyre::WrapErr;

/// Smallest idle step for replays. The controller reads time in whole
/// milliseconds, so anything shorter just burns iterations.
const REPLAY_MIN_IDLE_US: u64 = 1_000;

struct Timing {
    motion: MotionCfg,
    door: DoorCfg,
    display: DisplayCfg,
}

fn timing(cfg: &Config) -> Timing {
    Timing {
        motion: (&cfg.motion).into(),
        door: (&cfg.door).into(),
        display: (&cfg.display).into(),
    }
}

/// Run on the real clock with console keys and status lines until `shutdown` is raised.
pub fn run_live(cfg: &Config, stats: bool, shutdown: Arc<AtomicBool>) -> Result<LoopStats> {
    let t = timing(cfg);
    let reader = match KeyReader::spawn_terminal(Arc::clone(&shutdown)) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(error = %e, "console raw mode unavailable; reading stdin bytes");
            KeyReader::spawn(std::io::stdin())
        }
    };
    let inputs = TerminalInputs::new(reader, cfg.sim.start_fast, cfg.sim.start_destination);
    let mut terminal = AnsiTerminal::new(std::io::stdout());
    terminal.clear().wrap_err("clear terminal")?;

    let mut core = build_elevator(
        inputs,
        FramePanel::new(),
        terminal,
        t.motion,
        t.door,
        t.display,
        Some(cfg.queue.capacity),
        None,
    )?;
    core.begin()?;
    tracing::info!(
        capacity = cfg.queue.capacity,
        idle_us = cfg.runner.idle_us,
        "elevator live"
    );

    let loop_stats = runner::run(
        &mut core,
        (&cfg.runner).into(),
        |_| shutdown.load(Ordering::Relaxed),
        |r| {
            if let Some(Arrival::DropOff(req)) = r.arrival {
                tracing::debug!(
                    t_ms = r.now_ms,
                    origin = %req.origin,
                    destination = %req.destination,
                    "drop-off"
                );
            }
        },
    )?;

    let trips = core.trips_completed();
    let counters = core.counters();
    // Dropping the core drops the key reader, which leaves raw mode
    drop(core);
    if stats {
        print_stats(&loop_stats, trips, counters);
    }
    Ok(loop_stats)
}

/// Print loop stats to stderr.
fn print_stats(s: &LoopStats, trips: u64, counters: TripCounters) {
    eprintln!("\n--- Elevator Loop Stats ---");
    eprintln!("Iterations: {}", s.iterations);
    eprintln!(
        "Step cost mean/max (us): {} / {}",
        s.mean_step_us(),
        s.max_step_us
    );
    eprintln!("Trips completed: {trips}");
    eprintln!(
        "Floors with/without passenger: {} / {}",
        counters.with_passenger, counters.without_passenger
    );
    eprintln!("---------------------------\n");
}

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub elapsed_ms: u64,
    pub iterations: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub trips: u64,
    pub counters: TripCounters,
    pub final_floor: Option<Floor>,
    pub final_position: i16,
    /// False when `max_ms` cut the replay short.
    pub completed: bool,
}

fn to_event(step: &ScriptStep) -> TimedEvent {
    let event = match step.action {
        ScriptAction::Button(b) => InputEvent::Button(b),
        ScriptAction::Key(c) => InputEvent::Key(c),
        ScriptAction::Destination(d) => InputEvent::Destination(d),
        ScriptAction::Speed(fast) => InputEvent::Speed(fast),
    };
    TimedEvent {
        at_ms: step.at_ms,
        event,
    }
}

/// Replay `steps` on a virtual clock advanced by the loop's idle sleep.
///
/// Stops once every scripted event has been consumed and the car is
/// quiescent, or when `max_ms` of virtual time has passed.
pub fn replay<F>(
    cfg: &Config,
    steps: &[ScriptStep],
    max_ms: Option<u64>,
    mut on_report: F,
) -> Result<ReplaySummary>
where
    F: FnMut(&StepReport),
{
    let t = timing(cfg);
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock + Send + Sync> = Arc::new(clock.clone());
    let inputs = ScriptedInputs::new(
        shared,
        steps.iter().map(to_event).collect(),
        cfg.sim.start_fast,
        cfg.sim.start_destination,
    );

    let mut core = build_elevator(
        inputs,
        FramePanel::new(),
        TextGrid::new(),
        t.motion,
        t.door,
        t.display,
        Some(cfg.queue.capacity),
        Some(Box::new(clock)),
    )?;
    core.begin()?;

    let opts = RunOptions {
        idle_us: RunOptions::from(&cfg.runner).idle_us.max(REPLAY_MIN_IDLE_US),
    };
    let mut accepted = 0u64;
    let mut rejected = 0u64;
    let mut cut_short = false;
    tracing::info!(events = steps.len(), ?max_ms, "replay start");

    let stats = runner::run(
        &mut core,
        opts,
        |c| {
            if c.inputs().exhausted() && c.is_quiescent() {
                return true;
            }
            if max_ms.is_some_and(|m| c.now_ms() >= m) {
                cut_short = true;
                return true;
            }
            false
        },
        |r| {
            match r.intake {
                Some((_, Admission::Accepted)) => accepted += 1,
                Some((_, Admission::Rejected(_))) => rejected += 1,
                None => {}
            }
            on_report(r);
        },
    )?;

    Ok(ReplaySummary {
        elapsed_ms: core.now_ms(),
        iterations: stats.iterations,
        accepted,
        rejected,
        trips: core.trips_completed(),
        counters: core.counters(),
        final_floor: core.floor(),
        final_position: core.position().value(),
        completed: !cut_short,
    })
}

/// Build a boxed controller on simulated surfaces and run a few iterations.
pub fn self_check(cfg: &Config) -> Result<()> {
    let t = timing(cfg);
    let clock = ManualClock::new();
    let shared: Arc<dyn Clock + Send + Sync> = Arc::new(clock.clone());
    let inputs = ScriptedInputs::new(
        shared,
        Vec::new(),
        cfg.sim.start_fast,
        cfg.sim.start_destination,
    );

    let mut elevator = Elevator::builder()
        .with_inputs(inputs)
        .with_panel(FramePanel::new())
        .with_terminal(TextGrid::new())
        .with_motion(t.motion)
        .with_door(t.door)
        .with_display(t.display)
        .with_queue_capacity(cfg.queue.capacity)
        .with_clock(Box::new(clock.clone()))
        .build()?;
    elevator.begin()?;

    for _ in 0..10 {
        clock.advance_ms(t.display.toggle_ms);
        elevator.step()?;
    }
    if !elevator.is_quiescent() || elevator.floor() != Some(Floor::Ground) {
        eyre::bail!("self-check: idle controller left the ground floor ({elevator:?})");
    }
    tracing::info!("self-check passed");
    Ok(())
}
