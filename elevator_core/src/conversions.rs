//! `From` implementations bridging `elevator_config` types to `elevator_core` types.

use crate::config::{DisplayCfg, DoorCfg, MotionCfg};
use crate::runner::RunOptions;

// ── MotionCfg ────────────────────────────────────────────────────────────────

impl From<&elevator_config::MotionCfg> for MotionCfg {
    fn from(c: &elevator_config::MotionCfg) -> Self {
        Self {
            fast_interval_ms: c.fast_interval_ms,
            slow_interval_ms: c.slow_interval_ms,
        }
    }
}

// ── DoorCfg ──────────────────────────────────────────────────────────────────

impl From<&elevator_config::DoorCfg> for DoorCfg {
    fn from(c: &elevator_config::DoorCfg) -> Self {
        Self {
            announce_ms: c.announce_ms,
            open_ms: c.open_ms,
            close_ms: c.close_ms,
            tone_hz: c.tone_hz,
            tone_ms: c.tone_ms,
            tone_blocking: c.tone_blocking,
        }
    }
}

// ── DisplayCfg ───────────────────────────────────────────────────────────────

impl From<&elevator_config::DisplayCfg> for DisplayCfg {
    fn from(c: &elevator_config::DisplayCfg) -> Self {
        Self {
            toggle_ms: c.toggle_ms,
        }
    }
}

// ── RunOptions ───────────────────────────────────────────────────────────────

impl From<&elevator_config::RunnerCfg> for RunOptions {
    fn from(c: &elevator_config::RunnerCfg) -> Self {
        Self { idle_us: c.idle_us }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_agree_across_crates() {
        let file = elevator_config::Config::default();
        assert_eq!(MotionCfg::from(&file.motion), MotionCfg::default());
        assert_eq!(DoorCfg::from(&file.door), DoorCfg::default());
        assert_eq!(DisplayCfg::from(&file.display), DisplayCfg::default());
        assert_eq!(RunOptions::from(&file.runner), RunOptions::default());
    }
}
