//! Test and helper mocks for elevator_core.
//!
//! Recording surfaces keep everything the controller drove so tests can
//! inspect the board after any number of iterations.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use elevator_traits::{Colour, GRID_HEIGHT, GRID_WIDTH, Inputs, Panel, Terminal};

type SurfaceResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Inputs fed from plain queues. Each button and key is delivered once.
#[derive(Debug, Clone)]
pub struct FakeInputs {
    pub buttons: VecDeque<u8>,
    pub keys: VecDeque<char>,
    pub fast: bool,
    pub destination: u8,
    /// Number of times the speed switch was sampled.
    pub speed_reads: usize,
}

impl Default for FakeInputs {
    fn default() -> Self {
        Self {
            buttons: VecDeque::new(),
            keys: VecDeque::new(),
            fast: true,
            destination: 0,
            speed_reads: 0,
        }
    }
}

impl FakeInputs {
    /// Call the car to `origin` with the selector set to `destination`.
    pub fn call(&mut self, origin: u8, destination: u8) {
        self.destination = destination;
        self.buttons.push_back(origin);
    }
}

impl Inputs for FakeInputs {
    fn button_pushed(&mut self) -> SurfaceResult<Option<u8>> {
        Ok(self.buttons.pop_front())
    }

    fn read_character(&mut self) -> SurfaceResult<Option<char>> {
        Ok(self.keys.pop_front())
    }

    fn speed_switch(&mut self) -> SurfaceResult<bool> {
        self.speed_reads += 1;
        Ok(self.fast)
    }

    fn destination_switches(&mut self) -> SurfaceResult<u8> {
        Ok(self.destination)
    }
}

/// Panel that remembers the grid and logs every other output.
#[derive(Debug, Clone)]
pub struct RecordingPanel {
    grid: [[Colour; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    /// Every `(digit, bits)` driven onto the readout, in order.
    pub segments: Vec<(u8, u8)>,
    indicators: BTreeMap<u8, bool>,
    /// Every indicator write, in order.
    pub indicator_writes: Vec<(u8, bool)>,
    pub tones: Vec<(u32, Duration)>,
}

impl Default for RecordingPanel {
    fn default() -> Self {
        Self {
            grid: [[Colour::Empty; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            segments: Vec::new(),
            indicators: BTreeMap::new(),
            indicator_writes: Vec::new(),
            tones: Vec::new(),
        }
    }
}

impl RecordingPanel {
    /// Colour of a cell; `Empty` off the grid.
    pub fn pixel(&self, x: u8, y: u8) -> Colour {
        self.grid
            .get(usize::from(y))
            .and_then(|row| row.get(usize::from(x)))
            .copied()
            .unwrap_or(Colour::Empty)
    }

    pub fn indicator(&self, light: u8) -> bool {
        self.indicators.get(&light).copied().unwrap_or(false)
    }
}

impl Panel for RecordingPanel {
    fn set_pixel(&mut self, x: u8, y: u8, colour: Colour) -> SurfaceResult<()> {
        let cell = self
            .grid
            .get_mut(usize::from(y))
            .and_then(|row| row.get_mut(usize::from(x)))
            .ok_or_else(|| format!("pixel ({x},{y}) out of range"))?;
        *cell = colour;
        Ok(())
    }

    fn set_segment_bits(&mut self, digit: u8, bits: u8) -> SurfaceResult<()> {
        self.segments.push((digit, bits));
        Ok(())
    }

    fn set_indicator(&mut self, light: u8, on: bool) -> SurfaceResult<()> {
        self.indicators.insert(light, on);
        self.indicator_writes.push((light, on));
        Ok(())
    }

    fn emit_tone(&mut self, freq_hz: u32, duration: Duration) -> SurfaceResult<()> {
        self.tones.push((freq_hz, duration));
        Ok(())
    }
}

/// Panel whose readout driver always fails.
#[derive(Debug, Default)]
pub struct FaultyPanel;

impl Panel for FaultyPanel {
    fn set_pixel(&mut self, _x: u8, _y: u8, _colour: Colour) -> SurfaceResult<()> {
        Ok(())
    }

    fn set_segment_bits(&mut self, _digit: u8, _bits: u8) -> SurfaceResult<()> {
        Err(Box::new(std::io::Error::other("segment driver fault")))
    }

    fn set_indicator(&mut self, _light: u8, _on: bool) -> SurfaceResult<()> {
        Ok(())
    }

    fn emit_tone(&mut self, _freq_hz: u32, _duration: Duration) -> SurfaceResult<()> {
        Ok(())
    }
}

/// Terminal that keeps the text of each row, overwriting from the cursor.
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminal {
    rows: BTreeMap<u16, String>,
    cursor: (u16, u16),
    /// Number of `print` calls.
    pub prints: usize,
}

impl RecordingTerminal {
    /// Text on `row` with trailing padding removed.
    pub fn line(&self, row: u16) -> Option<&str> {
        self.rows.get(&row).map(|s| s.trim_end())
    }
}

impl Terminal for RecordingTerminal {
    fn move_cursor(&mut self, col: u16, row: u16) -> SurfaceResult<()> {
        self.cursor = (col, row);
        Ok(())
    }

    fn print(&mut self, text: &str) -> SurfaceResult<()> {
        let (col, row) = self.cursor;
        let line = self.rows.entry(row).or_default();
        let start = usize::from(col.max(1) - 1);
        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() < start {
            chars.resize(start, ' ');
        }
        for (i, c) in text.chars().enumerate() {
            match chars.get_mut(start + i) {
                Some(slot) => *slot = c,
                None => chars.push(c),
            }
        }
        *line = chars.into_iter().collect();
        self.cursor.0 = col.saturating_add(u16::try_from(text.chars().count()).unwrap_or(u16::MAX));
        self.prints += 1;
        Ok(())
    }
}
