//! Runtime configuration for the controller.
//!
//! These are the structs `ElevatorCore` is built from. They are separate from
//! the TOML-deserialized config in `elevator_config`; see `conversions`.

/// Motion timing, selected per tick by the speed switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionCfg {
    /// Interval between one-unit moves with the switch in the fast position (ms).
    pub fast_interval_ms: u64,
    /// Interval between one-unit moves with the switch in the slow position (ms).
    pub slow_interval_ms: u64,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            fast_interval_ms: 100,
            slow_interval_ms: 300,
        }
    }
}

/// Door cycle thresholds, all measured from the trigger instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorCfg {
    /// `[0, announce_ms)`: tone only.
    pub announce_ms: u64,
    /// `[announce_ms, open_ms)`: opening.
    pub open_ms: u64,
    /// `[open_ms, close_ms)`: closing. Inactive from `close_ms` on.
    pub close_ms: u64,
    pub tone_hz: u32,
    pub tone_ms: u64,
    /// Wait out the tone on the clock before `trigger` returns.
    pub tone_blocking: bool,
}

impl Default for DoorCfg {
    fn default() -> Self {
        Self {
            announce_ms: 400,
            open_ms: 800,
            close_ms: 1200,
            tone_hz: 500,
            tone_ms: 100,
            tone_blocking: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCfg {
    /// Interval between readout digit toggles (ms).
    pub toggle_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self { toggle_ms: 100 }
    }
}
