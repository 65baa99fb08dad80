//! Report returned from each control loop iteration.

use crate::controller::Admission;
use crate::dispatch::{Arrival, Stage};
use crate::display::Digit;
use crate::door::DoorPhase;
use crate::floor::Position;
use crate::queue::Request;

/// What one call to `step()` observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Controller time at the start of the iteration (ms since `begin`).
    pub now_ms: u64,
    pub position: Position,
    pub stage: Stage,
    /// Door phase after this iteration's door tick and any trigger.
    pub door: DoorPhase,
    /// A trip was admitted from the queue head.
    pub admitted: Option<Request>,
    pub arrival: Option<Arrival>,
    /// The car moved one unit.
    pub moved: bool,
    /// The move ended exactly on a floor.
    pub crossed_floor: bool,
    /// A request was sampled from the inputs, and what the queue did with it.
    pub intake: Option<(Request, Admission)>,
    /// Digit selected by the multiplexer, when it toggled this iteration.
    pub digit: Option<Digit>,
}
