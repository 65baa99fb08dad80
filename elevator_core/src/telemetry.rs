//! Status lines for the text surface.
//!
//! Lines 1-2 (floor, direction) are redrawn only when either value changes.
//! Lines 3-4 (trip counters) are redrawn on the iteration a floor is crossed.

use elevator_traits::Terminal;
use eyre::WrapErr;

use crate::error::Result;
use crate::floor::{Direction, Position};
use crate::hw_error::surface_err;

/// Floors crossed, split by whether a passenger was aboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripCounters {
    pub with_passenger: u64,
    pub without_passenger: u64,
}

impl TripCounters {
    pub fn record(&mut self, with_passenger: bool) {
        if with_passenger {
            self.with_passenger += 1;
        } else {
            self.without_passenger += 1;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    last_drawn: Option<(Direction, i16)>,
    counters: TripCounters,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> TripCounters {
        self.counters
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Redraw floor and direction if they differ from what is on screen.
    /// Returns whether anything was written.
    pub fn refresh<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        position: Position,
        goal: Position,
    ) -> Result<bool> {
        let current = (Direction::between(position, goal), position.floor_index());
        if self.last_drawn == Some(current) {
            return Ok(false);
        }
        let (dir, floor) = current;
        write_line(term, 1, &format!("Current Floor: {floor}   "))?;
        write_line(term, 2, &format!("Direction: {}        ", dir.label()))?;
        self.last_drawn = Some(current);
        Ok(true)
    }

    /// Count one floor crossing and redraw the counters.
    pub fn record_crossing<T: Terminal + ?Sized>(
        &mut self,
        term: &mut T,
        with_passenger: bool,
    ) -> Result<()> {
        self.counters.record(with_passenger);
        tracing::trace!(
            with_passenger = self.counters.with_passenger,
            without_passenger = self.counters.without_passenger,
            "floor crossed"
        );
        self.draw_counters(term)
    }

    pub fn draw_counters<T: Terminal + ?Sized>(&self, term: &mut T) -> Result<()> {
        write_line(
            term,
            3,
            &format!("Floors with Passenger: {}", self.counters.with_passenger),
        )?;
        write_line(
            term,
            4,
            &format!("Floors without Passenger: {}", self.counters.without_passenger),
        )
    }
}

fn write_line<T: Terminal + ?Sized>(term: &mut T, row: u16, text: &str) -> Result<()> {
    term.move_cursor(1, row)
        .map_err(surface_err)
        .wrap_err("move_cursor")?;
    term.print(text).map_err(surface_err).wrap_err("print")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingTerminal;

    #[test]
    fn redraws_only_on_change() {
        let mut term = RecordingTerminal::default();
        let mut t = Telemetry::new();
        assert!(t.refresh(&mut term, Position(0), Position(8)).unwrap());
        assert_eq!(term.line(2), Some("Direction: Up"));
        // Same floor index, same direction
        assert!(!t.refresh(&mut term, Position(1), Position(8)).unwrap());
        assert!(t.refresh(&mut term, Position(4), Position(8)).unwrap());
        assert_eq!(term.line(1), Some("Current Floor: 1"));
        assert!(t.refresh(&mut term, Position(8), Position(8)).unwrap());
        assert_eq!(term.line(2), Some("Direction: Stationary"));
    }

    #[test]
    fn crossings_are_classified_by_passenger() {
        let mut term = RecordingTerminal::default();
        let mut t = Telemetry::new();
        t.record_crossing(&mut term, false).unwrap();
        t.record_crossing(&mut term, true).unwrap();
        t.record_crossing(&mut term, true).unwrap();
        assert_eq!(
            t.counters(),
            TripCounters {
                with_passenger: 2,
                without_passenger: 1
            }
        );
        assert_eq!(term.line(3), Some("Floors with Passenger: 2"));
        assert_eq!(term.line(4), Some("Floors without Passenger: 1"));
    }
}
