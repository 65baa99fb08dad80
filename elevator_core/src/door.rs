//! Door animation: a fixed-length cycle started on every arrival.
//!
//! The phase is a pure function of the time since trigger. While the door is
//! active this controller is the only writer of the door indicator lights.

use std::time::Duration;

use elevator_traits::{Clock, DOOR_INDICATORS, INDICATOR_DOOR_CLOSING, INDICATOR_DOOR_OPENING, Panel};
use eyre::WrapErr;

use crate::config::DoorCfg;
use crate::error::{ControllerError, Result};
use crate::hw_error::surface_err;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorPhase {
    Inactive,
    /// Tone only.
    Announce,
    Opening,
    Closing,
}

impl DoorPhase {
    pub fn label(self) -> &'static str {
        match self {
            DoorPhase::Inactive => "inactive",
            DoorPhase::Announce => "announce",
            DoorPhase::Opening => "opening",
            DoorPhase::Closing => "closing",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DoorController {
    cfg: DoorCfg,
    triggered_at_ms: Option<u64>,
    phase: DoorPhase,
}

impl DoorController {
    pub fn new(cfg: DoorCfg) -> Self {
        Self {
            cfg,
            triggered_at_ms: None,
            phase: DoorPhase::Inactive,
        }
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != DoorPhase::Inactive
    }

    /// Phase for a given time since trigger.
    pub fn phase_at(&self, elapsed_ms: u64) -> DoorPhase {
        if elapsed_ms < self.cfg.announce_ms {
            DoorPhase::Announce
        } else if elapsed_ms < self.cfg.open_ms {
            DoorPhase::Opening
        } else if elapsed_ms < self.cfg.close_ms {
            DoorPhase::Closing
        } else {
            DoorPhase::Inactive
        }
    }

    /// Start a door cycle at `now_ms` and sound the alert tone.
    ///
    /// With `tone_blocking` set, the tone is waited out on `clock` before
    /// returning. Triggering an active door is an invariant violation.
    pub fn trigger<P: Panel + ?Sized>(
        &mut self,
        now_ms: u64,
        panel: &mut P,
        clock: &dyn Clock,
    ) -> Result<()> {
        if self.is_active() {
            return Err(eyre::Report::new(ControllerError::State(format!(
                "door triggered while {}",
                self.phase.label()
            ))));
        }
        self.triggered_at_ms = Some(now_ms);
        self.phase = DoorPhase::Announce;
        tracing::debug!(at_ms = now_ms, "door cycle start");

        let tone = Duration::from_millis(self.cfg.tone_ms);
        panel
            .emit_tone(self.cfg.tone_hz, tone)
            .map_err(surface_err)
            .wrap_err("emit_tone")?;
        if self.cfg.tone_blocking {
            clock.sleep(tone);
        }
        Ok(())
    }

    /// Advance the cycle to `now_ms`, updating indicators on phase changes.
    pub fn tick<P: Panel + ?Sized>(&mut self, now_ms: u64, panel: &mut P) -> Result<DoorPhase> {
        let Some(at) = self.triggered_at_ms else {
            return Ok(DoorPhase::Inactive);
        };
        let next = self.phase_at(now_ms.saturating_sub(at));
        if next == self.phase {
            return Ok(next);
        }
        match next {
            DoorPhase::Opening => {
                set_light(panel, INDICATOR_DOOR_CLOSING, false)?;
                set_light(panel, INDICATOR_DOOR_OPENING, true)?;
            }
            DoorPhase::Closing => {
                set_light(panel, INDICATOR_DOOR_OPENING, false)?;
                set_light(panel, INDICATOR_DOOR_CLOSING, true)?;
            }
            DoorPhase::Inactive => {
                clear_lights(panel)?;
                self.triggered_at_ms = None;
            }
            DoorPhase::Announce => {}
        }
        tracing::debug!(
            from = self.phase.label(),
            to = next.label(),
            at_ms = now_ms,
            "door phase"
        );
        self.phase = next;
        Ok(next)
    }

    /// Drop any cycle in progress and switch the indicators off.
    pub fn reset<P: Panel + ?Sized>(&mut self, panel: &mut P) -> Result<()> {
        self.triggered_at_ms = None;
        self.phase = DoorPhase::Inactive;
        clear_lights(panel)
    }
}

fn set_light<P: Panel + ?Sized>(panel: &mut P, light: u8, on: bool) -> Result<()> {
    panel
        .set_indicator(light, on)
        .map_err(surface_err)
        .wrap_err("set_indicator")
}

fn clear_lights<P: Panel + ?Sized>(panel: &mut P) -> Result<()> {
    for light in DOOR_INDICATORS {
        set_light(panel, light, false)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingPanel;
    use elevator_traits::ManualClock;

    #[test]
    fn phases_follow_the_threshold_table() {
        let d = DoorController::new(DoorCfg::default());
        assert_eq!(d.phase_at(0), DoorPhase::Announce);
        assert_eq!(d.phase_at(399), DoorPhase::Announce);
        assert_eq!(d.phase_at(400), DoorPhase::Opening);
        assert_eq!(d.phase_at(800), DoorPhase::Closing);
        assert_eq!(d.phase_at(1199), DoorPhase::Closing);
        assert_eq!(d.phase_at(1200), DoorPhase::Inactive);
    }

    #[test]
    fn trigger_sounds_tone_and_waits_on_clock() {
        let clock = ManualClock::new();
        let mut panel = RecordingPanel::default();
        let mut d = DoorController::new(DoorCfg::default());
        d.trigger(0, &mut panel, &clock).unwrap();
        assert_eq!(panel.tones, vec![(500, Duration::from_millis(100))]);
        assert_eq!(clock.elapsed_ms(), 100);
        assert_eq!(d.phase(), DoorPhase::Announce);
    }

    #[test]
    fn non_blocking_tone_leaves_clock_alone() {
        let clock = ManualClock::new();
        let mut panel = RecordingPanel::default();
        let cfg = DoorCfg {
            tone_blocking: false,
            ..DoorCfg::default()
        };
        let mut d = DoorController::new(cfg);
        d.trigger(0, &mut panel, &clock).unwrap();
        assert_eq!(clock.elapsed_ms(), 0);
    }

    #[test]
    fn retrigger_while_active_is_refused() {
        let clock = ManualClock::new();
        let mut panel = RecordingPanel::default();
        let mut d = DoorController::new(DoorCfg::default());
        d.trigger(0, &mut panel, &clock).unwrap();
        assert!(d.trigger(10, &mut panel, &clock).is_err());
        assert_eq!(panel.tones.len(), 1);
    }

    #[test]
    fn tick_drives_indicators_and_clears_them_at_the_end() {
        let clock = ManualClock::new();
        let mut panel = RecordingPanel::default();
        let mut d = DoorController::new(DoorCfg::default());
        d.trigger(0, &mut panel, &clock).unwrap();

        assert_eq!(d.tick(450, &mut panel).unwrap(), DoorPhase::Opening);
        assert!(panel.indicator(INDICATOR_DOOR_OPENING));
        assert_eq!(d.tick(900, &mut panel).unwrap(), DoorPhase::Closing);
        assert!(!panel.indicator(INDICATOR_DOOR_OPENING));
        assert!(panel.indicator(INDICATOR_DOOR_CLOSING));
        assert_eq!(d.tick(1200, &mut panel).unwrap(), DoorPhase::Inactive);
        assert!(!d.is_active());
        assert!(DOOR_INDICATORS.iter().all(|l| !panel.indicator(*l)));
    }

    #[test]
    fn late_tick_goes_straight_to_inactive() {
        let clock = ManualClock::new();
        let mut panel = RecordingPanel::default();
        let mut d = DoorController::new(DoorCfg::default());
        d.trigger(0, &mut panel, &clock).unwrap();
        assert_eq!(d.tick(5_000, &mut panel).unwrap(), DoorPhase::Inactive);
        assert!(!d.is_active());
    }
}
