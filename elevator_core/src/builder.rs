//! Type-state builder for `Elevator` and the generic `build_elevator` constructor.
//!
//! The builder enforces at compile time that inputs, panel and terminal are
//! provided before `build()` is available. `try_build()` is always available
//! for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use elevator_traits::{Clock, Inputs, MonotonicClock, Panel, Terminal};

use crate::config::{DisplayCfg, DoorCfg, MotionCfg};
use crate::controller::ElevatorCore;
use crate::error::{BuildError, Result};
use crate::queue::RequestQueue;

/// Largest queue the builder accepts.
pub const MAX_QUEUE_CAPACITY: usize = 64;

/// Dynamically dispatched controller over boxed surfaces.
pub type Elevator = ElevatorCore<Box<dyn Inputs>, Box<dyn Panel>, Box<dyn Terminal>>;

impl Elevator {
    /// Start building an Elevator.
    pub fn builder() -> ElevatorBuilder<Missing, Missing, Missing> {
        ElevatorBuilder::default()
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Elevator`. Timing is validated on `build()`.
pub struct ElevatorBuilder<I, P, T> {
    inputs: Option<Box<dyn Inputs>>,
    panel: Option<Box<dyn Panel>>,
    terminal: Option<Box<dyn Terminal>>,
    motion: Option<MotionCfg>,
    door: Option<DoorCfg>,
    display: Option<DisplayCfg>,
    queue_capacity: Option<usize>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
    _i: PhantomData<I>,
    _p: PhantomData<P>,
    _t: PhantomData<T>,
}

impl Default for ElevatorBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            inputs: None,
            panel: None,
            terminal: None,
            motion: None,
            door: None,
            display: None,
            queue_capacity: None,
            clock: None,
            _i: PhantomData,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate timing and construct an `ElevatorCore`.
///
/// Shared by `ElevatorBuilder::try_build()` and `build_elevator()`.
#[allow(clippy::too_many_arguments)]
fn validate_and_build<I: Inputs, P: Panel, T: Terminal>(
    inputs: I,
    panel: P,
    terminal: T,
    motion: MotionCfg,
    door: DoorCfg,
    display: DisplayCfg,
    queue_capacity: usize,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<ElevatorCore<I, P, T>> {
    if motion.fast_interval_ms == 0 || motion.slow_interval_ms == 0 {
        return Err(invalid("motion intervals must be >= 1 ms"));
    }
    if door.announce_ms == 0 {
        return Err(invalid("door announce_ms must be >= 1"));
    }
    if !(door.announce_ms < door.open_ms && door.open_ms < door.close_ms) {
        return Err(invalid("door thresholds must be strictly increasing"));
    }
    if door.tone_hz == 0 {
        return Err(invalid("door tone_hz must be > 0"));
    }
    if door.tone_ms >= door.announce_ms {
        return Err(invalid("door tone_ms must be shorter than announce_ms"));
    }
    if display.toggle_ms == 0 {
        return Err(invalid("display toggle_ms must be >= 1"));
    }
    if !(1..=MAX_QUEUE_CAPACITY).contains(&queue_capacity) {
        return Err(invalid("queue capacity out of range"));
    }

    let clock: Arc<dyn Clock + Send + Sync> = match clock {
        Some(b) => Arc::from(b),
        None => Arc::new(MonotonicClock::new()),
    };

    Ok(ElevatorCore::from_parts(
        inputs,
        panel,
        terminal,
        clock,
        motion,
        door,
        display,
        queue_capacity,
    ))
}

impl<I, P, T> ElevatorBuilder<I, P, T> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<Elevator> {
        let inputs = self
            .inputs
            .ok_or_else(|| eyre::Report::new(BuildError::MissingInputs))?;
        let panel = self
            .panel
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPanel))?;
        let terminal = self
            .terminal
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTerminal))?;

        validate_and_build(
            inputs,
            panel,
            terminal,
            self.motion.unwrap_or_default(),
            self.door.unwrap_or_default(),
            self.display.unwrap_or_default(),
            self.queue_capacity
                .unwrap_or(RequestQueue::DEFAULT_CAPACITY),
            self.clock,
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<I, P, T> ElevatorBuilder<I, P, T> {
    pub fn with_motion(mut self, motion: MotionCfg) -> Self {
        self.motion = Some(motion);
        self
    }
    pub fn with_door(mut self, door: DoorCfg) -> Self {
        self.door = Some(door);
        self
    }
    pub fn with_display(mut self, display: DisplayCfg) -> Self {
        self.display = Some(display);
        self
    }
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }
    /// Provide a custom clock implementation; defaults to `MonotonicClock` when not provided.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }
}

// Setters that advance type-state
impl<P, T> ElevatorBuilder<Missing, P, T> {
    pub fn with_inputs(self, inputs: impl Inputs + 'static) -> ElevatorBuilder<Set, P, T> {
        ElevatorBuilder {
            inputs: Some(Box::new(inputs)),
            panel: self.panel,
            terminal: self.terminal,
            motion: self.motion,
            door: self.door,
            display: self.display,
            queue_capacity: self.queue_capacity,
            clock: self.clock,
            _i: PhantomData,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

impl<I, T> ElevatorBuilder<I, Missing, T> {
    pub fn with_panel(self, panel: impl Panel + 'static) -> ElevatorBuilder<I, Set, T> {
        ElevatorBuilder {
            inputs: self.inputs,
            panel: Some(Box::new(panel)),
            terminal: self.terminal,
            motion: self.motion,
            door: self.door,
            display: self.display,
            queue_capacity: self.queue_capacity,
            clock: self.clock,
            _i: PhantomData,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

impl<I, P> ElevatorBuilder<I, P, Missing> {
    pub fn with_terminal(self, terminal: impl Terminal + 'static) -> ElevatorBuilder<I, P, Set> {
        ElevatorBuilder {
            inputs: self.inputs,
            panel: self.panel,
            terminal: Some(Box::new(terminal)),
            motion: self.motion,
            door: self.door,
            display: self.display,
            queue_capacity: self.queue_capacity,
            clock: self.clock,
            _i: PhantomData,
            _p: PhantomData,
            _t: PhantomData,
        }
    }
}

impl ElevatorBuilder<Set, Set, Set> {
    /// Validate and build. Only available once inputs, panel and terminal are set.
    pub fn build(self) -> Result<Elevator> {
        self.try_build()
    }
}

/// Build a statically dispatched controller from concrete surfaces.
///
/// Delegates to the same validation as the builder.
#[allow(clippy::too_many_arguments)]
pub fn build_elevator<I, P, T>(
    inputs: I,
    panel: P,
    terminal: T,
    motion: MotionCfg,
    door: DoorCfg,
    display: DisplayCfg,
    queue_capacity: Option<usize>,
    clock: Option<Box<dyn Clock + Send + Sync>>,
) -> Result<ElevatorCore<I, P, T>>
where
    I: Inputs,
    P: Panel,
    T: Terminal,
{
    validate_and_build(
        inputs,
        panel,
        terminal,
        motion,
        door,
        display,
        queue_capacity.unwrap_or(RequestQueue::DEFAULT_CAPACITY),
        clock,
    )
}
