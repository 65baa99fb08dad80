//! The controller aggregate (`ElevatorCore`).
//!
//! Owns every piece of loop state together with the injected clock and
//! surfaces. `step()` is one cooperative iteration:
//!
//! 1. advance the door cycle
//! 2. admit the queue head into dispatch (idle, door inactive)
//! 3. on arrival at the sub-goal, trigger a door cycle and advance the trip
//! 4. with the door inactive, move the car and sample intake
//! 5. multiplex the readout
//! 6. refresh the status lines

use std::sync::Arc;
use std::time::Instant;

use elevator_traits::{Clock, Inputs, Panel, Terminal};
use eyre::WrapErr;

use crate::config::{DisplayCfg, DoorCfg, MotionCfg};
use crate::dispatch::{Arrival, Dispatcher, Stage};
use crate::display::DisplayMux;
use crate::door::{DoorController, DoorPhase};
use crate::error::Result;
use crate::floor::{Floor, Position};
use crate::grid;
use crate::hw_error::surface_err;
use crate::intake;
use crate::motion::{MotionController, MotionStep};
use crate::queue::{QueueReject, Request, RequestQueue};
use crate::status::StepReport;
use crate::telemetry::{Telemetry, TripCounters};

/// What the queue did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected(QueueReject),
}

pub struct ElevatorCore<I: Inputs, P: Panel, T: Terminal> {
    pub(crate) inputs: I,
    pub(crate) panel: P,
    pub(crate) terminal: T,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,

    pub(crate) position: Position,
    pub(crate) queue: RequestQueue,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) motion: MotionController,
    pub(crate) door: DoorController,
    pub(crate) display: DisplayMux,
    pub(crate) telemetry: Telemetry,
    pub(crate) trips_completed: u64,
}

impl<I: Inputs, P: Panel, T: Terminal> core::fmt::Debug for ElevatorCore<I, P, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ElevatorCore")
            .field("position", &self.position.value())
            .field("goal", &self.dispatcher.goal().value())
            .field("stage", &self.dispatcher.stage())
            .field("door", &self.door.phase())
            .field("queued", &self.queue.len())
            .field("trips_completed", &self.trips_completed)
            .finish()
    }
}

impl<I: Inputs, P: Panel, T: Terminal> ElevatorCore<I, P, T> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        inputs: I,
        panel: P,
        terminal: T,
        clock: Arc<dyn Clock + Send + Sync>,
        motion: MotionCfg,
        door: DoorCfg,
        display: DisplayCfg,
        queue_capacity: usize,
    ) -> Self {
        let epoch = clock.now();
        Self {
            inputs,
            panel,
            terminal,
            clock,
            epoch,
            position: Position::GROUND,
            queue: RequestQueue::with_capacity(queue_capacity),
            dispatcher: Dispatcher::new(),
            motion: MotionController::new(motion),
            door: DoorController::new(door),
            display: DisplayMux::new(display),
            telemetry: Telemetry::new(),
            trips_completed: 0,
        }
    }

    /// Reset to floor 0 with an empty queue and an idle door, then draw the
    /// static scene. Call once before the first `step()`.
    pub fn begin(&mut self) -> Result<()> {
        self.epoch = self.clock.now();
        self.position = Position::GROUND;
        self.queue.clear();
        self.dispatcher.reset();
        self.motion.reset(0);
        self.display.reset();
        self.telemetry.reset();
        self.trips_completed = 0;
        self.door.reset(&mut self.panel)?;

        grid::draw_shaft(&mut self.panel)?;
        grid::draw_car(&mut self.panel, self.position)?;
        self.telemetry
            .refresh(&mut self.terminal, self.position, self.dispatcher.goal())?;
        self.telemetry.draw_counters(&mut self.terminal)?;
        tracing::debug!("controller reset to ground floor");
        Ok(())
    }

    /// One iteration of the control loop.
    pub fn step(&mut self) -> Result<StepReport> {
        let now = self.now_ms();
        let mut report = StepReport {
            now_ms: now,
            position: self.position,
            stage: self.dispatcher.stage(),
            door: DoorPhase::Inactive,
            admitted: None,
            arrival: None,
            moved: false,
            crossed_floor: false,
            intake: None,
            digit: None,
        };

        self.door.tick(now, &mut self.panel)?;

        if self.dispatcher.is_idle() && !self.door.is_active() {
            report.admitted = self.dispatcher.admit(&self.queue);
        }

        if !self.door.is_active()
            && let Some(arrival) = self.dispatcher.on_position(self.position, &mut self.queue)?
        {
            self.door.trigger(now, &mut self.panel, &*self.clock)?;
            match arrival {
                Arrival::Pickup(_) => grid::draw_waiting(&mut self.panel, &self.queue)?,
                Arrival::DropOff(req) => {
                    self.trips_completed += 1;
                    tracing::info!(
                        origin = %req.origin,
                        destination = %req.destination,
                        trips = self.trips_completed,
                        "trip complete"
                    );
                }
            }
            report.arrival = Some(arrival);
        }

        if !self.door.is_active() {
            self.advance_motion(now, &mut report)?;
            report.intake = self.sample_intake()?;
        }

        report.digit =
            self.display
                .tick(now, &mut self.panel, self.position, self.dispatcher.goal())?;
        self.telemetry
            .refresh(&mut self.terminal, self.position, self.dispatcher.goal())?;

        report.position = self.position;
        report.stage = self.dispatcher.stage();
        report.door = self.door.phase();
        Ok(report)
    }

    /// Offer a request to the queue as if it came from the inputs.
    pub fn submit(&mut self, req: Request) -> Result<Admission> {
        match self.queue.enqueue(req) {
            Ok(()) => {
                grid::draw_waiting(&mut self.panel, &self.queue)?;
                tracing::debug!(
                    origin = %req.origin,
                    destination = %req.destination,
                    queued = self.queue.len(),
                    "request queued"
                );
                Ok(Admission::Accepted)
            }
            Err(reason) => {
                tracing::debug!(
                    origin = %req.origin,
                    destination = %req.destination,
                    ?reason,
                    "request dropped"
                );
                Ok(Admission::Rejected(reason))
            }
        }
    }

    fn advance_motion(&mut self, now: u64, report: &mut StepReport) -> Result<()> {
        let fast = self
            .inputs
            .speed_switch()
            .map_err(surface_err)
            .wrap_err("speed_switch")?;
        let goal = self.dispatcher.goal();
        if let MotionStep::Moved {
            from,
            to,
            crossed_floor,
        } = self.motion.tick(now, fast, &mut self.position, goal)
        {
            grid::move_car(&mut self.panel, from, to)?;
            report.moved = true;
            if crossed_floor {
                report.crossed_floor = true;
                self.telemetry
                    .record_crossing(&mut self.terminal, self.dispatcher.has_passenger())?;
            }
        }
        Ok(())
    }

    fn sample_intake(&mut self) -> Result<Option<(Request, Admission)>> {
        let Some(req) = intake::sample(&mut self.inputs)? else {
            return Ok(None);
        };
        let outcome = self.submit(req)?;
        Ok(Some((req, outcome)))
    }

    /// Milliseconds since `begin()` on the injected clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.ms_since(self.epoch)
    }

    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Floor the car is stopped at, if it is exactly on one.
    pub fn floor(&self) -> Option<Floor> {
        Floor::at(self.position)
    }

    pub fn goal(&self) -> Position {
        self.dispatcher.goal()
    }

    pub fn stage(&self) -> Stage {
        self.dispatcher.stage()
    }

    pub fn door_phase(&self) -> DoorPhase {
        self.door.phase()
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    pub fn counters(&self) -> TripCounters {
        self.telemetry.counters()
    }

    pub fn trips_completed(&self) -> u64 {
        self.trips_completed
    }

    /// No trip, nothing queued and the door closed.
    pub fn is_quiescent(&self) -> bool {
        self.dispatcher.is_idle() && self.queue.is_empty() && !self.door.is_active()
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut I {
        &mut self.inputs
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }
}
