pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::time::Duration;

/// Width of the visualisation grid in cells.
pub const GRID_WIDTH: u8 = 8;
/// Height of the visualisation grid in cells.
pub const GRID_HEIGHT: u8 = 16;

/// Indicator light lit while the doors are visually opening.
pub const INDICATOR_DOOR_OPENING: u8 = 0;
/// Indicator light lit while the doors are visually closing.
pub const INDICATOR_DOOR_CLOSING: u8 = 1;
/// All door indicator ids, in the order they are cleared.
pub const DOOR_INDICATORS: [u8; 2] = [INDICATOR_DOOR_OPENING, INDICATOR_DOOR_CLOSING];

/// Palette of the visualisation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Empty,
    Floor,
    Car,
    /// A waiting passenger, coloured by destination floor index (0..=3).
    Passenger(u8),
}

/// Discrete hardware inputs sampled by the control loop.
pub trait Inputs {
    /// Floor button pressed since the last call, if any (0..=3).
    fn button_pushed(&mut self) -> Result<Option<u8>, Box<dyn std::error::Error + Send + Sync>>;
    /// Next character from the serial terminal, if one is available.
    fn read_character(&mut self) -> Result<Option<char>, Box<dyn std::error::Error + Send + Sync>>;
    /// Speed switch level; `true` selects the fast motion interval.
    fn speed_switch(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
    /// Raw destination selector; only the low two bits are meaningful.
    fn destination_switches(&mut self) -> Result<u8, Box<dyn std::error::Error + Send + Sync>>;
}

/// Board outputs: grid pixels, the two-digit readout, indicator lights, buzzer.
pub trait Panel {
    fn set_pixel(
        &mut self,
        x: u8,
        y: u8,
        colour: Colour,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Drive `bits` onto the readout with `digit` (0 = left, 1 = right) selected.
    fn set_segment_bits(
        &mut self,
        digit: u8,
        bits: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn set_indicator(
        &mut self,
        light: u8,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Start a tone. Implementations must not block; the caller owns any wait.
    fn emit_tone(
        &mut self,
        freq_hz: u32,
        duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Cursor-addressed text surface for status lines.
pub trait Terminal {
    fn move_cursor(
        &mut self,
        col: u16,
        row: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn print(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Inputs + ?Sized> Inputs for Box<T> {
    fn button_pushed(&mut self) -> Result<Option<u8>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).button_pushed()
    }
    fn read_character(&mut self) -> Result<Option<char>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_character()
    }
    fn speed_switch(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).speed_switch()
    }
    fn destination_switches(&mut self) -> Result<u8, Box<dyn std::error::Error + Send + Sync>> {
        (**self).destination_switches()
    }
}

impl<T: Panel + ?Sized> Panel for Box<T> {
    fn set_pixel(
        &mut self,
        x: u8,
        y: u8,
        colour: Colour,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_pixel(x, y, colour)
    }
    fn set_segment_bits(
        &mut self,
        digit: u8,
        bits: u8,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_segment_bits(digit, bits)
    }
    fn set_indicator(
        &mut self,
        light: u8,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_indicator(light, on)
    }
    fn emit_tone(
        &mut self,
        freq_hz: u32,
        duration: Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).emit_tone(freq_hz, duration)
    }
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn move_cursor(
        &mut self,
        col: u16,
        row: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).move_cursor(col, row)
    }
    fn print(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).print(text)
    }
}
