//! Dispatch state machine: turns the queue head into a two-leg trip.
//!
//! `Idle -> ApproachingOrigin -> ApproachingDestination -> Idle`. A request is
//! peeked when admitted and popped only at the pickup arrival, so it leaves
//! the queue exactly once however many arrivals its trip produces.

use crate::error::{ControllerError, Result};
use crate::floor::Position;
use crate::queue::{Request, RequestQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Idle,
    ApproachingOrigin,
    ApproachingDestination,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::ApproachingOrigin => "approaching_origin",
            Stage::ApproachingDestination => "approaching_destination",
        }
    }
}

/// Arrival at the current sub-goal. Each one triggers a door cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Pickup(Request),
    DropOff(Request),
}

/// The active trip, if any, and the motion sub-goal.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    trip: Option<Request>,
    stage: Stage,
    goal: Position,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            trip: None,
            stage: Stage::Idle,
            goal: Position::GROUND,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_idle(&self) -> bool {
        self.stage == Stage::Idle
    }

    /// True while the passenger of the active trip is aboard.
    pub fn has_passenger(&self) -> bool {
        self.stage == Stage::ApproachingDestination
    }

    /// Motion sub-goal. Stays at the last destination once a trip ends.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Start a trip for the queue head when idle. The head stays queued.
    pub fn admit(&mut self, queue: &RequestQueue) -> Option<Request> {
        if !self.is_idle() {
            return None;
        }
        let req = queue.peek_head()?;
        self.trip = Some(req);
        self.stage = Stage::ApproachingOrigin;
        self.goal = req.origin.base();
        tracing::debug!(
            origin = %req.origin,
            destination = %req.destination,
            "trip admitted"
        );
        Some(req)
    }

    /// Advance the trip when `position` has reached the sub-goal.
    ///
    /// The caller must only ask while the door is inactive. Returns the
    /// arrival that needs a door cycle, or `None` when nothing happened.
    pub fn on_position(
        &mut self,
        position: Position,
        queue: &mut RequestQueue,
    ) -> Result<Option<Arrival>> {
        if position != self.goal {
            return Ok(None);
        }
        match (self.stage, self.trip) {
            (Stage::Idle, _) => Ok(None),
            (Stage::ApproachingOrigin, Some(req)) => {
                let popped = queue.pop_head().ok_or_else(|| {
                    eyre::Report::new(ControllerError::State(
                        "pickup with an empty request queue".into(),
                    ))
                })?;
                if popped != req {
                    return Err(eyre::Report::new(ControllerError::State(format!(
                        "queue head changed under an active trip: {popped:?} != {req:?}"
                    ))));
                }
                self.stage = Stage::ApproachingDestination;
                self.goal = req.destination.base();
                tracing::debug!(floor = %req.origin, "pickup");
                Ok(Some(Arrival::Pickup(req)))
            }
            (Stage::ApproachingDestination, Some(req)) => {
                self.stage = Stage::Idle;
                self.trip = None;
                tracing::debug!(floor = %req.destination, "drop-off");
                Ok(Some(Arrival::DropOff(req)))
            }
            (stage, None) => Err(eyre::Report::new(ControllerError::State(format!(
                "stage {} without an active trip",
                stage.label()
            )))),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
