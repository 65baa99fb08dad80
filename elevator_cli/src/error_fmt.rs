//! Human-readable error descriptions and structured JSON error formatting.

use elevator_core::error::{BuildError, ControllerError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingInputs => {
                "What happened: No input source was provided to the controller.\nLikely causes: The key reader or replay script was not wired into the builder.\nHow to fix: Pass an input surface via with_inputs(...).".to_string()
            }
            BuildError::MissingPanel => {
                "What happened: No panel was provided to the controller.\nLikely causes: The LED grid/readout surface failed to initialize or was not wired into the builder.\nHow to fix: Pass a panel via with_panel(...).".to_string()
            }
            BuildError::MissingTerminal => {
                "What happened: No terminal was provided to the controller.\nLikely causes: The status output was not wired into the builder.\nHow to fix: Pass a terminal via with_terminal(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range timing or queue values in the TOML.\nHow to fix: Edit the config file, then rerun. Run `elevator self-check` to validate it."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<ControllerError>() {
        return match ce {
            ControllerError::Hardware(msg) => format!(
                "What happened: A board surface reported an I/O error ({msg}).\nLikely causes: The terminal or input stream was closed underneath the controller.\nHow to fix: Check that stdout/stdin are still attached, then rerun."
            ),
            ControllerError::HardwareFault(msg) => format!(
                "What happened: A board surface rejected a write ({msg}).\nLikely causes: Out-of-range pixel or digit, or a driver fault.\nHow to fix: Re-run with --log-level=debug to see which surface call failed."
            ),
            ControllerError::State(msg) => format!(
                "What happened: The controller reached an impossible state ({msg}).\nLikely causes: A bug in dispatch or a queue that was modified mid-trip.\nHow to fix: Re-run with --log-level=trace and report the log."
            ),
        };
    }

    // String-based heuristics for errors coming from init, config or scripts
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("replay script must have headers") {
        return "Invalid headers in replay script. Expected 'at_ms,kind,value'.".to_string();
    }

    if lower.contains("open replay script") {
        return format!(
            "What happened: The replay script could not be opened.\nLikely causes: Wrong path or missing read permission.\nHow to fix: Check the --script argument. Original: {msg}"
        );
    }

    if lower.contains("invalid csv row") || lower.contains("must be non-decreasing") {
        return format!(
            "What happened: The replay script has a malformed row.\nLikely causes: Non-numeric at_ms, an unknown kind, or rows out of time order.\nHow to fix: Fix the row named below and rerun. Original: {msg}"
        );
    }

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing read permission.\nHow to fix: Point --config at an existing TOML file, or omit it to use defaults. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return format!(
            "What happened: Configuration is invalid or incomplete.\nLikely causes: Unknown keys, wrong value types, or out-of-range timing values.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable name for the error class, used as the JSON `reason`.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(_) => "InvalidConfig",
            _ => "Build",
        };
    }
    if let Some(ce) = err.downcast_ref::<ControllerError>() {
        return match ce {
            ControllerError::Hardware(_) => "Hardware",
            ControllerError::HardwareFault(_) => "HardwareFault",
            ControllerError::State(_) => "State",
        };
    }
    "Error"
}

/// Map controller errors to stable exit codes; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<ControllerError>() {
        Some(ControllerError::Hardware(_)) => 3,
        Some(ControllerError::HardwareFault(_)) => 4,
        Some(ControllerError::State(_)) => 5,
        None => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
