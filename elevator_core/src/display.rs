//! Two-digit readout multiplexer.
//!
//! One physical readout, two logical digits: the left shows the direction of
//! travel, the right the floor number with the decimal point as a marker.
//! The selection flips on a fixed period regardless of any other state.

use elevator_traits::Panel;
use eyre::WrapErr;

use crate::config::DisplayCfg;
use crate::error::Result;
use crate::floor::{Direction, Position};
use crate::hw_error::surface_err;
use crate::util::interval_elapsed;

/// Segment bits for the decimal digits 0..=3 (A = bit 0 .. G = bit 6).
pub const DIGIT_SEGMENTS: [u8; 4] = [0x3F, 0x06, 0x5B, 0x4F];
/// Segment A.
pub const GLYPH_UP: u8 = 0x01;
/// Segment D.
pub const GLYPH_DOWN: u8 = 0x08;
/// Segment G.
pub const GLYPH_LEVEL: u8 = 0x40;
/// Decimal point; set only on the floor digit.
pub const MARKER_DP: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digit {
    Direction,
    Floor,
}

impl Digit {
    /// Physical digit select line.
    pub fn index(self) -> u8 {
        match self {
            Digit::Direction => 0,
            Digit::Floor => 1,
        }
    }

    fn other(self) -> Self {
        match self {
            Digit::Direction => Digit::Floor,
            Digit::Floor => Digit::Direction,
        }
    }
}

pub fn direction_glyph(dir: Direction) -> u8 {
    match dir {
        Direction::Up => GLYPH_UP,
        Direction::Down => GLYPH_DOWN,
        Direction::Stationary => GLYPH_LEVEL,
    }
}

/// Floor digit bits for `position`, marker included.
pub fn floor_bits(position: Position) -> u8 {
    let segments = usize::try_from(position.floor_index())
        .ok()
        .and_then(|i| DIGIT_SEGMENTS.get(i))
        .copied()
        .unwrap_or(0);
    segments | MARKER_DP
}

#[derive(Debug, Clone)]
pub struct DisplayMux {
    cfg: DisplayCfg,
    last_toggle_ms: Option<u64>,
    showing: Digit,
}

impl DisplayMux {
    pub fn new(cfg: DisplayCfg) -> Self {
        Self {
            cfg,
            last_toggle_ms: None,
            showing: Digit::Floor,
        }
    }

    /// Digit currently asserted. Before the first toggle nothing has been driven.
    pub fn showing(&self) -> Option<Digit> {
        self.last_toggle_ms.map(|_| self.showing)
    }

    pub fn reset(&mut self) {
        self.last_toggle_ms = None;
        self.showing = Digit::Floor;
    }

    /// Toggle when due and drive the newly selected digit.
    ///
    /// The direction glyph is recomputed from `position` and `goal` on every
    /// toggle to it. Returns the digit selected, if a toggle happened.
    pub fn tick<P: Panel + ?Sized>(
        &mut self,
        now_ms: u64,
        panel: &mut P,
        position: Position,
        goal: Position,
    ) -> Result<Option<Digit>> {
        if let Some(last) = self.last_toggle_ms
            && !interval_elapsed(now_ms, last, self.cfg.toggle_ms)
        {
            return Ok(None);
        }
        self.last_toggle_ms = Some(now_ms);
        self.showing = self.showing.other();

        let bits = match self.showing {
            Digit::Direction => direction_glyph(Direction::between(position, goal)),
            Digit::Floor => floor_bits(position),
        };
        panel
            .set_segment_bits(self.showing.index(), bits)
            .map_err(surface_err)
            .wrap_err("set_segment_bits")?;
        tracing::trace!(digit = self.showing.index(), bits, "readout");
        Ok(Some(self.showing))
    }
}
