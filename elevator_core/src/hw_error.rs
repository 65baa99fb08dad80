//! Maps `Box<dyn Error>` from surface trait boundaries to typed `ControllerError`.
//!
//! The traits in `elevator_traits` use `Box<dyn Error + Send + Sync>` so any
//! board can plug in; this module converts those to our typed error enum, with
//! an optional feature-gated path for `elevator_hardware::HwError` downcasting.

use crate::error::ControllerError;

/// Map a trait-boundary error to a typed `ControllerError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> ControllerError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<elevator_hardware::error::HwError>() {
            return match hw {
                elevator_hardware::error::HwError::Io(_) => ControllerError::Hardware(hw.to_string()),
                other => ControllerError::HardwareFault(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    if s.to_lowercase().contains("fault") {
        ControllerError::HardwareFault(s)
    } else {
        ControllerError::Hardware(s)
    }
}

/// Convert a boxed surface error into an `eyre::Report` carrying `ControllerError`.
pub(crate) fn surface_err(e: Box<dyn std::error::Error + Send + Sync>) -> eyre::Report {
    eyre::Report::new(map_hw_error(&*e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_message_classification() {
        let e = std::io::Error::other("segment driver fault");
        assert!(matches!(map_hw_error(&e), ControllerError::HardwareFault(_)));
        let e = std::io::Error::other("bus busy");
        assert!(matches!(map_hw_error(&e), ControllerError::Hardware(_)));
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn downcasts_known_hardware_errors() {
        let e = elevator_hardware::error::HwError::OutOfRange(9, 0);
        assert!(matches!(map_hw_error(&e), ControllerError::HardwareFault(_)));
    }
}
