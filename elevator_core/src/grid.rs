//! Shaft visualisation on the 8x16 pixel grid.
//!
//! Floors are full-width rows at each floor base. The car is a 2x3 sprite
//! sitting just above its position; it never paints over a floor row.
//! Waiting passengers line up to the right of the shaft, one row above
//! their origin floor, coloured by destination. The lane shows at most
//! `LANE_SLOTS` per floor; later arrivals stay queued and appear as the
//! lane drains.

use elevator_traits::{Colour, GRID_HEIGHT, GRID_WIDTH, Panel};
use eyre::WrapErr;

use crate::error::Result;
use crate::floor::{FLOOR_SPACING, Floor, Position};
use crate::hw_error::surface_err;
use crate::queue::RequestQueue;

/// Columns occupied by the car.
pub const CAR_COLUMNS: [u8; 2] = [1, 2];
/// Height of the car sprite in rows.
pub const CAR_HEIGHT: i16 = 3;
/// First column of the waiting lane.
pub const LANE_START: u8 = 4;
/// Passengers shown per floor; the lane runs to the right edge.
pub const LANE_SLOTS: u8 = GRID_WIDTH - LANE_START;

fn paint<P: Panel + ?Sized>(panel: &mut P, x: u8, y: u8, colour: Colour) -> Result<()> {
    panel
        .set_pixel(x, y, colour)
        .map_err(surface_err)
        .wrap_err("set_pixel")
}

/// True for rows that carry a floor line.
pub fn is_floor_row(row: i16) -> bool {
    row.rem_euclid(FLOOR_SPACING) == 0
}

/// Rows covered by the car at `position`, floor rows excluded.
pub fn car_rows(position: Position) -> impl Iterator<Item = u8> {
    (1..=CAR_HEIGHT)
        .map(move |i| position.value() + i)
        .filter(|row| !is_floor_row(*row))
        .filter_map(|row| u8::try_from(row).ok())
        .filter(|row| *row < GRID_HEIGHT)
}

/// Blank the grid and draw the floor lines.
pub fn draw_shaft<P: Panel + ?Sized>(panel: &mut P) -> Result<()> {
    for y in 0..GRID_HEIGHT {
        let colour = if is_floor_row(i16::from(y)) {
            Colour::Floor
        } else {
            Colour::Empty
        };
        for x in 0..GRID_WIDTH {
            paint(panel, x, y, colour)?;
        }
    }
    Ok(())
}

pub fn draw_car<P: Panel + ?Sized>(panel: &mut P, position: Position) -> Result<()> {
    for y in car_rows(position) {
        for x in CAR_COLUMNS {
            paint(panel, x, y, Colour::Car)?;
        }
    }
    Ok(())
}

/// Redraw the car after a one-unit move, clearing the row it left.
pub fn move_car<P: Panel + ?Sized>(panel: &mut P, from: Position, to: Position) -> Result<()> {
    let vacated = if to > from {
        from.value() + 1
    } else {
        from.value() + CAR_HEIGHT
    };
    if !is_floor_row(vacated)
        && let Ok(y) = u8::try_from(vacated)
        && y < GRID_HEIGHT
    {
        for x in CAR_COLUMNS {
            paint(panel, x, y, Colour::Empty)?;
        }
    }
    draw_car(panel, to)
}

/// Redraw the waiting lane of every floor from the queue, oldest first.
pub fn draw_waiting<P: Panel + ?Sized>(panel: &mut P, queue: &RequestQueue) -> Result<()> {
    for floor in Floor::ALL {
        let Ok(y) = u8::try_from(floor.base().value() + 1) else {
            continue;
        };
        let mut waiting = queue
            .iter()
            .filter(|r| r.origin == floor)
            .map(|r| Colour::Passenger(r.destination.index()));
        for slot in 0..LANE_SLOTS {
            let colour = waiting.next().unwrap_or(Colour::Empty);
            paint(panel, LANE_START + slot, y, colour)?;
        }
        let hidden = waiting.count();
        if hidden > 0 {
            tracing::trace!(floor = %floor, hidden, "waiting lane full");
        }
    }
    Ok(())
}
