//! Floors and the position scale.
//!
//! A `Floor` is one of the four stopping levels. A `Position` is a point on
//! the finer scale the car moves along; floors sit `FLOOR_SPACING` units
//! apart so the car passes through sub-floor frames between stops.

use core::fmt;

/// Number of stopping levels.
pub const FLOOR_COUNT: u8 = 4;
/// Position units between adjacent floors.
pub const FLOOR_SPACING: i16 = 4;
/// Highest valid position (top floor base).
pub const TOP_POSITION: i16 = (FLOOR_COUNT as i16 - 1) * FLOOR_SPACING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Floor {
    Ground,
    First,
    Second,
    Third,
}

impl Floor {
    pub const ALL: [Floor; FLOOR_COUNT as usize] =
        [Floor::Ground, Floor::First, Floor::Second, Floor::Third];

    /// Floor for a 0-based index, if one exists.
    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(usize::from(idx)).copied()
    }

    pub fn index(self) -> u8 {
        match self {
            Floor::Ground => 0,
            Floor::First => 1,
            Floor::Second => 2,
            Floor::Third => 3,
        }
    }

    /// Base coordinate of this floor on the position scale.
    pub fn base(self) -> Position {
        Position(i16::from(self.index()) * FLOOR_SPACING)
    }

    /// Floor whose base is exactly `pos`; `None` between floors or off the scale.
    pub fn at(pos: Position) -> Option<Self> {
        if pos.0 % FLOOR_SPACING != 0 {
            return None;
        }
        u8::try_from(pos.0 / FLOOR_SPACING)
            .ok()
            .and_then(Self::from_index)
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Signed coordinate on the position scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(pub i16);

impl Position {
    pub const GROUND: Position = Position(0);

    pub fn value(self) -> i16 {
        self.0
    }

    /// Index of the floor at or below this position.
    pub fn floor_index(self) -> i16 {
        self.0.div_euclid(FLOOR_SPACING)
    }

    /// True when the position lies exactly on a floor boundary.
    pub fn on_boundary(self) -> bool {
        self.0.rem_euclid(FLOOR_SPACING) == 0
    }

    /// One unit toward `goal`; unchanged when already there.
    pub fn step_toward(self, goal: Position) -> Position {
        match goal.0.cmp(&self.0) {
            core::cmp::Ordering::Greater => Position(self.0 + 1),
            core::cmp::Ordering::Less => Position(self.0 - 1),
            core::cmp::Ordering::Equal => self,
        }
    }
}

impl From<Floor> for Position {
    fn from(f: Floor) -> Self {
        f.base()
    }
}

/// Travel direction of the car relative to its current goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Stationary,
}

impl Direction {
    pub fn between(position: Position, goal: Position) -> Self {
        match goal.cmp(&position) {
            core::cmp::Ordering::Greater => Direction::Up,
            core::cmp::Ordering::Less => Direction::Down,
            core::cmp::Ordering::Equal => Direction::Stationary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Stationary => "Stationary",
        }
    }
}
