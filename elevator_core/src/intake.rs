//! Request intake: turns one sample of the inputs into at most one request.

use elevator_traits::Inputs;
use eyre::WrapErr;

use crate::error::Result;
use crate::floor::Floor;
use crate::hw_error::surface_err;
use crate::queue::Request;

/// Floor selected by a serial character, if it names one.
pub fn floor_for_key(c: char) -> Option<Floor> {
    c.to_digit(10)
        .and_then(|d| u8::try_from(d).ok())
        .and_then(Floor::from_index)
}

/// Sample the inputs once.
///
/// Both the button latch and the serial character are consumed on every
/// call; the button wins when both name a floor. The destination selector is
/// read in the same sample. The returned request may still be degenerate;
/// the queue is the single place that refuses those.
pub fn sample<I: Inputs>(inputs: &mut I) -> Result<Option<Request>> {
    let button = inputs
        .button_pushed()
        .map_err(surface_err)
        .wrap_err("button_pushed")?;
    let key = inputs
        .read_character()
        .map_err(surface_err)
        .wrap_err("read_character")?;

    let origin = button
        .and_then(Floor::from_index)
        .or_else(|| key.and_then(floor_for_key));
    let Some(origin) = origin else {
        if let Some(b) = button {
            tracing::debug!(button = b, "ignoring unknown button");
        }
        return Ok(None);
    };

    let raw = inputs
        .destination_switches()
        .map_err(surface_err)
        .wrap_err("destination_switches")?;
    let destination = Floor::from_index(raw & 0b11).unwrap_or(Floor::Ground);
    Ok(Some(Request::new(origin, destination)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::FakeInputs;
    use rstest::rstest;

    #[rstest]
    #[case('0', Some(Floor::Ground))]
    #[case('3', Some(Floor::Third))]
    #[case('4', None)]
    #[case('s', None)]
    fn keys_map_to_floors(#[case] c: char, #[case] floor: Option<Floor>) {
        assert_eq!(floor_for_key(c), floor);
    }

    #[test]
    fn button_wins_over_key_and_both_are_consumed() {
        let mut inputs = FakeInputs::default();
        inputs.buttons.push_back(1);
        inputs.keys.push_back('2');
        inputs.destination = 3;
        let req = sample(&mut inputs).unwrap();
        assert_eq!(req, Some(Request::new(Floor::First, Floor::Third)));
        assert!(inputs.keys.is_empty());
        assert_eq!(sample(&mut inputs).unwrap(), None);
    }

    #[test]
    fn selector_is_masked_to_two_bits() {
        let mut inputs = FakeInputs::default();
        inputs.keys.push_back('0');
        inputs.destination = 0b110;
        let req = sample(&mut inputs).unwrap().unwrap();
        assert_eq!(req.destination, Floor::Second);
    }

    #[test]
    fn degenerate_requests_pass_through_to_the_queue() {
        let mut inputs = FakeInputs::default();
        inputs.keys.push_back('2');
        inputs.destination = 2;
        let req = sample(&mut inputs).unwrap().unwrap();
        assert!(req.is_degenerate());
    }
}
