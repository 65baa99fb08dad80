//! Simulated board surfaces for the elevator controller.
//!
//! - `TerminalInputs`: keyboard-driven inputs fed by a `KeyReader` thread
//! - `ScriptedInputs`: time-scripted inputs for replays and tests
//! - `FramePanel`: frame-buffered grid, readout, indicators and buzzer
//! - `AnsiTerminal` / `TextGrid`: text surfaces for the status lines
pub mod error;
pub mod keys;
pub mod script;
pub mod terminal;

use std::collections::VecDeque;
use std::time::Duration;

use elevator_traits::{Colour, GRID_HEIGHT, GRID_WIDTH, Inputs, Panel};

use crate::error::HwError;
use crate::keys::KeyReader;

pub use script::{InputEvent, ScriptedInputs, TimedEvent};
pub use terminal::{AnsiTerminal, TextGrid};

/// Keys that move the destination selector to floors 0..=3.
pub const DESTINATION_KEYS: [char; 4] = ['z', 'x', 'c', 'v'];
/// Key that flips the speed switch.
pub const SPEED_KEY: char = 'f';

/// Keyboard-driven inputs.
///
/// Floor characters (`0`..`3`) are passed through as serial characters.
/// Switch keys are consumed here and latch the simulated switch levels.
pub struct TerminalInputs {
    reader: KeyReader,
    chars: VecDeque<char>,
    destination: u8,
    fast: bool,
    closed: bool,
}

impl TerminalInputs {
    pub fn new(reader: KeyReader, start_fast: bool, start_destination: u8) -> Self {
        Self {
            reader,
            chars: VecDeque::new(),
            destination: start_destination & 0b11,
            fast: start_fast,
            closed: false,
        }
    }

    fn pump(&mut self) {
        if self.closed {
            return;
        }
        loop {
            match self.reader.poll() {
                Ok(Some(c)) => self.accept(c.to_ascii_lowercase()),
                Ok(None) => break,
                Err(HwError::Disconnected) => {
                    tracing::warn!("key input closed; switches keep their last level");
                    self.closed = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "key input failed");
                    break;
                }
            }
        }
    }

    fn accept(&mut self, c: char) {
        if let Some(idx) = DESTINATION_KEYS.iter().position(|k| *k == c) {
            self.destination = idx as u8;
            tracing::debug!(destination = self.destination, "destination selector moved");
        } else if c == SPEED_KEY {
            self.fast = !self.fast;
            tracing::debug!(fast = self.fast, "speed switch flipped");
        } else {
            self.chars.push_back(c);
        }
    }
}

impl Inputs for TerminalInputs {
    fn button_pushed(&mut self) -> Result<Option<u8>, Box<dyn std::error::Error + Send + Sync>> {
        // No physical buttons on a keyboard-only rig
        Ok(None)
    }

    fn read_character(&mut self) -> Result<Option<char>, Box<dyn std::error::Error + Send + Sync>> {
        self.pump();
        Ok(self.chars.pop_front())
    }

    fn speed_switch(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        self.pump();
        Ok(self.fast)
    }

    fn destination_switches(&mut self) -> Result<u8, Box<dyn std::error::Error + Send + Sync>> {
        self.pump();
        Ok(self.destination)
    }
}

/// Frame-buffered panel. Keeps the last value written to every output so a
/// front end (or a test) can inspect the board at any instant.
#[derive(Debug, Clone)]
pub struct FramePanel {
    grid: [[Colour; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
    selected_digit: u8,
    segment_bits: u8,
    indicators: [bool; 8],
    tones: usize,
}

impl Default for FramePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FramePanel {
    pub fn new() -> Self {
        Self {
            grid: [[Colour::Empty; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            selected_digit: 0,
            segment_bits: 0,
            indicators: [false; 8],
            tones: 0,
        }
    }

    pub fn pixel(&self, x: u8, y: u8) -> Option<Colour> {
        self.grid
            .get(usize::from(y))
            .and_then(|row| row.get(usize::from(x)))
            .copied()
    }

    /// Currently selected digit and the bits driven onto it.
    pub fn readout(&self) -> (u8, u8) {
        (self.selected_digit, self.segment_bits)
    }

    pub fn indicator(&self, light: u8) -> bool {
        self.indicators
            .get(usize::from(light))
            .copied()
            .unwrap_or(false)
    }

    pub fn tones(&self) -> usize {
        self.tones
    }
}

impl Panel for FramePanel {
    fn set_pixel(
        &mut self,
        x: u8,
        y: u8,
        colour: Colour,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let cell = self
            .grid
            .get_mut(usize::from(y))
            .and_then(|row| row.get_mut(usize::from(x)))
            .ok_or(HwError::OutOfRange(x, y))?;
        *cell = colour;
        Ok(())
    }

    fn set_segment_bits(
        &mut self,
        digit: u8,
        bits: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if digit > 1 {
            return Err(Box::new(HwError::BadDigit(digit)));
        }
        self.selected_digit = digit;
        self.segment_bits = bits;
        Ok(())
    }

    fn set_indicator(
        &mut self,
        light: u8,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(slot) = self.indicators.get_mut(usize::from(light)) {
            *slot = on;
        }
        Ok(())
    }

    fn emit_tone(
        &mut self,
        freq_hz: u32,
        duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tones += 1;
        tracing::debug!(freq_hz, duration_ms = duration.as_millis() as u64, "tone");
        Ok(())
    }
}
