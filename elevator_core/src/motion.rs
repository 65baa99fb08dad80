//! One-unit-per-interval car motion.

use crate::config::MotionCfg;
use crate::floor::Position;
use crate::util::interval_elapsed;

/// Outcome of one motion tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStep {
    /// The interval has not elapsed yet.
    Waiting,
    /// The interval elapsed but the car is already at the goal. The timer restarts.
    Holding,
    Moved {
        from: Position,
        to: Position,
        /// `to` lies exactly on a floor.
        crossed_floor: bool,
    },
}

#[derive(Debug, Clone)]
pub struct MotionController {
    cfg: MotionCfg,
    last_tick_ms: u64,
}

impl MotionController {
    pub fn new(cfg: MotionCfg) -> Self {
        Self {
            cfg,
            last_tick_ms: 0,
        }
    }

    /// Interval selected by the current speed switch level.
    pub fn interval_ms(&self, fast: bool) -> u64 {
        if fast {
            self.cfg.fast_interval_ms
        } else {
            self.cfg.slow_interval_ms
        }
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.last_tick_ms = now_ms;
    }

    /// Move at most one unit toward `goal`.
    ///
    /// `fast` is the switch level sampled this iteration. However long ago the
    /// last tick was, the car never moves more than one unit per call.
    pub fn tick(
        &mut self,
        now_ms: u64,
        fast: bool,
        position: &mut Position,
        goal: Position,
    ) -> MotionStep {
        let interval = self.interval_ms(fast);
        if !interval_elapsed(now_ms, self.last_tick_ms, interval) {
            return MotionStep::Waiting;
        }
        self.last_tick_ms = now_ms;

        let from = *position;
        let to = from.step_toward(goal);
        if to == from {
            return MotionStep::Holding;
        }
        *position = to;
        tracing::trace!(from = from.value(), to = to.value(), interval, "car moved");
        MotionStep::Moved {
            from,
            to,
            crossed_floor: to.on_boundary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_strictly_more_than_the_interval() {
        let mut m = MotionController::new(MotionCfg::default());
        let mut pos = Position::GROUND;
        assert_eq!(m.tick(100, true, &mut pos, Position(8)), MotionStep::Waiting);
        assert!(matches!(
            m.tick(101, true, &mut pos, Position(8)),
            MotionStep::Moved { .. }
        ));
        assert_eq!(pos, Position(1));
    }

    #[test]
    fn stale_timer_does_not_accelerate() {
        let mut m = MotionController::new(MotionCfg::default());
        let mut pos = Position::GROUND;
        m.tick(10_000, true, &mut pos, Position(12));
        assert_eq!(pos, Position(1));
        assert_eq!(m.tick(10_050, true, &mut pos, Position(12)), MotionStep::Waiting);
    }

    #[test]
    fn holding_restarts_the_timer() {
        let mut m = MotionController::new(MotionCfg::default());
        let mut pos = Position(4);
        assert_eq!(m.tick(150, true, &mut pos, Position(4)), MotionStep::Holding);
        assert_eq!(m.tick(200, true, &mut pos, Position(8)), MotionStep::Waiting);
        assert!(matches!(
            m.tick(251, true, &mut pos, Position(8)),
            MotionStep::Moved {
                crossed_floor: false,
                ..
            }
        ));
    }

    #[test]
    fn reports_floor_crossings() {
        let mut m = MotionController::new(MotionCfg::default());
        let mut pos = Position(3);
        let step = m.tick(101, true, &mut pos, Position(8));
        assert_eq!(
            step,
            MotionStep::Moved {
                from: Position(3),
                to: Position(4),
                crossed_floor: true
            }
        );
    }
}
