//! Time-scripted input source for replays and tests.
//!
//! Events carry an offset in milliseconds from the moment the source was
//! created. Each poll releases every event whose offset has been reached on
//! the shared clock; switch events change the latched switch level, button
//! and key events are buffered until read.
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use elevator_traits::{Clock, Inputs};

/// One scripted input change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Button(u8),
    Key(char),
    Destination(u8),
    /// `true` selects the fast interval.
    Speed(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: InputEvent,
}

pub struct ScriptedInputs {
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    pending: VecDeque<TimedEvent>,
    buttons: VecDeque<u8>,
    keys: VecDeque<char>,
    destination: u8,
    fast: bool,
}

impl ScriptedInputs {
    /// Events are sorted by offset; ties keep their given order.
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        mut events: Vec<TimedEvent>,
        start_fast: bool,
        start_destination: u8,
    ) -> Self {
        events.sort_by_key(|e| e.at_ms);
        let epoch = clock.now();
        Self {
            clock,
            epoch,
            pending: events.into(),
            buttons: VecDeque::new(),
            keys: VecDeque::new(),
            destination: start_destination & 0b11,
            fast: start_fast,
        }
    }

    /// True once every scripted event has been released and consumed.
    pub fn exhausted(&self) -> bool {
        self.pending.is_empty() && self.buttons.is_empty() && self.keys.is_empty()
    }

    fn release_due(&mut self) {
        let now = self.clock.ms_since(self.epoch);
        while let Some(next) = self.pending.front().copied() {
            if next.at_ms > now {
                break;
            }
            self.pending.pop_front();
            tracing::trace!(at_ms = next.at_ms, event = ?next.event, "scripted input released");
            match next.event {
                InputEvent::Button(b) => self.buttons.push_back(b),
                InputEvent::Key(c) => self.keys.push_back(c),
                InputEvent::Destination(d) => self.destination = d & 0b11,
                InputEvent::Speed(fast) => self.fast = fast,
            }
        }
    }
}

impl Inputs for ScriptedInputs {
    fn button_pushed(&mut self) -> Result<Option<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self.release_due();
        Ok(self.buttons.pop_front())
    }

    fn read_character(&mut self) -> Result<Option<char>, Box<dyn std::error::Error + Send + Sync>> {
        self.release_due();
        Ok(self.keys.pop_front())
    }

    fn speed_switch(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.release_due();
        Ok(self.fast)
    }

    fn destination_switches(&mut self) -> Result<u8, Box<dyn std::error::Error + Send + Sync>> {
        self.release_due();
        Ok(self.destination)
    }
}
