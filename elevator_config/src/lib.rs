#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and replay-script parsing for the elevator controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; missing sections take the board defaults.
//! - Replay scripts are CSV files with strict headers and time-ordered rows.
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct MotionCfg {
    /// Motion tick interval with the speed switch in the fast position (ms).
    pub fast_interval_ms: u64,
    /// Motion tick interval with the speed switch in the slow position (ms).
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DoorCfg {
    /// End of the tone-only phase, measured from trigger (ms).
    pub announce_ms: u64,
    /// End of the opening phase (ms).
    pub open_ms: u64,
    /// End of the closing phase; the door is inactive from here on (ms).
    pub close_ms: u64,
    pub tone_hz: u32,
    pub tone_ms: u64,
    /// Wait out the tone inside the loop iteration that triggers the door.
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

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayCfg {
    /// Interval between readout digit toggles (ms).
    pub toggle_ms: u64,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self { toggle_ms: 100 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct QueueCfg {
    pub capacity: usize,
}

impl Default for QueueCfg {
    fn default() -> Self {
        Self { capacity: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerCfg {
    /// Idle time handed back to the OS after every loop iteration (µs).
    pub idle_us: u64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self { idle_us: 500 }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SimCfg {
    /// Initial speed switch level for simulated inputs.
    pub start_fast: bool,
    /// Initial destination selector for simulated inputs (0..=3).
    pub start_destination: u8,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            start_fast: true,
            start_destination: 0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub motion: MotionCfg,
    pub door: DoorCfg,
    pub display: DisplayCfg,
    pub queue: QueueCfg,
    pub runner: RunnerCfg,
    pub logging: Logging,
    pub sim: SimCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Largest queue the controller will allocate.
pub const MAX_QUEUE_CAPACITY: usize = 64;

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Motion
        if self.motion.fast_interval_ms == 0 {
            eyre::bail!("motion.fast_interval_ms must be >= 1");
        }
        if self.motion.slow_interval_ms == 0 {
            eyre::bail!("motion.slow_interval_ms must be >= 1");
        }

        // Door
        if self.door.announce_ms == 0 {
            eyre::bail!("door.announce_ms must be >= 1");
        }
        if self.door.open_ms <= self.door.announce_ms {
            eyre::bail!("door.open_ms must be > door.announce_ms");
        }
        if self.door.close_ms <= self.door.open_ms {
            eyre::bail!("door.close_ms must be > door.open_ms");
        }
        if self.door.tone_hz == 0 {
            eyre::bail!("door.tone_hz must be > 0");
        }
        if self.door.tone_ms >= self.door.announce_ms {
            eyre::bail!("door.tone_ms must be < door.announce_ms");
        }

        // Display
        if self.display.toggle_ms == 0 {
            eyre::bail!("display.toggle_ms must be >= 1");
        }

        // Queue
        if !(1..=MAX_QUEUE_CAPACITY).contains(&self.queue.capacity) {
            eyre::bail!("queue.capacity must be in [1, {MAX_QUEUE_CAPACITY}]");
        }

        // Runner
        if self.runner.idle_us > 1_000_000 {
            eyre::bail!("runner.idle_us is unreasonably large (>1s)");
        }

        // Sim
        if self.sim.start_destination > 3 {
            eyre::bail!("sim.start_destination must be in [0, 3]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Replay script CSV schema.
///
/// Expected headers:
/// at_ms,kind,value
///
/// Example:
/// at_ms,kind,value
/// 0,destination,2
/// 10,button,0
/// 2500,speed,slow
#[derive(Debug, Deserialize, Clone)]
pub struct ScriptRow {
    pub at_ms: u64,
    pub kind: String,
    pub value: String,
}

/// A validated script step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptAction {
    Button(u8),
    Key(char),
    Destination(u8),
    /// `true` selects the fast interval.
    Speed(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub action: ScriptAction,
}

impl ScriptRow {
    fn to_step(&self, line: usize) -> eyre::Result<ScriptStep> {
        let value = self.value.trim();
        let floor = |what: &str| -> eyre::Result<u8> {
            match value.parse::<u8>() {
                Ok(v) if v <= 3 => Ok(v),
                _ => eyre::bail!("line {line}: {what} must be a floor 0..=3, got '{value}'"),
            }
        };
        let action = match self.kind.trim().to_ascii_lowercase().as_str() {
            "button" => ScriptAction::Button(floor("button")?),
            "destination" => ScriptAction::Destination(floor("destination")?),
            "key" => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ScriptAction::Key(c),
                    _ => eyre::bail!("line {line}: key must be a single character"),
                }
            }
            "speed" => match value.to_ascii_lowercase().as_str() {
                "fast" | "1" | "true" => ScriptAction::Speed(true),
                "slow" | "0" | "false" => ScriptAction::Speed(false),
                other => eyre::bail!("line {line}: speed must be fast|slow, got '{other}'"),
            },
            other => eyre::bail!(
                "line {line}: unknown kind '{other}' (expected button|key|destination|speed)"
            ),
        };
        Ok(ScriptStep {
            at_ms: self.at_ms,
            action,
        })
    }
}

/// Validate parsed rows: every row must be well formed and `at_ms` must never decrease.
pub fn script_from_rows(rows: &[ScriptRow]) -> eyre::Result<Vec<ScriptStep>> {
    let mut out = Vec::with_capacity(rows.len());
    let mut last_ms = 0u64;
    for (idx, row) in rows.iter().enumerate() {
        // Header is line 1
        let line = idx + 2;
        if row.at_ms < last_ms {
            eyre::bail!(
                "line {line}: at_ms must be non-decreasing ({} after {last_ms})",
                row.at_ms
            );
        }
        last_ms = row.at_ms;
        out.push(row.to_step(line)?);
    }
    Ok(out)
}

pub fn load_script_csv(path: &std::path::Path) -> eyre::Result<Vec<ScriptStep>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open replay script {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["at_ms", "kind", "value"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "replay script must have headers 'at_ms,kind,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ScriptRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    script_from_rows(&rows)
}
