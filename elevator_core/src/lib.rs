#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core elevator control logic (hardware-agnostic).
//!
//! This crate provides the cooperative control loop of a four-floor elevator.
//! All hardware interactions go through the `elevator_traits::Inputs`,
//! `Panel` and `Terminal` traits; all time is read through `Clock`.
//!
//! ## Architecture
//!
//! - **Floors**: `Floor` stops on a finer `Position` scale (`floor` module)
//! - **Queue**: bounded FIFO of requests (`queue`), fed by `intake`
//! - **Dispatch**: two-leg trips from the queue head (`dispatch`)
//! - **Motion / Door / Display**: independently timed state machines
//! - **Telemetry / Grid**: status lines and the shaft visualisation
//! - **Controller**: `ElevatorCore` owns all of the above; `step()` is one iteration
//!
//! Nothing in `step()` blocks except the optional door tone wait, which is
//! bounded by `DoorCfg::tone_ms` and spent on the injected clock.

pub mod builder;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod dispatch;
pub mod display;
pub mod door;
pub mod error;
pub mod floor;
pub mod grid;
pub mod hw_error;
pub mod intake;
pub mod mocks;
pub mod motion;
pub mod queue;
pub mod runner;
pub mod status;
pub mod telemetry;
pub mod util;

pub use builder::{Elevator, ElevatorBuilder, Missing, Set, build_elevator};
pub use config::{DisplayCfg, DoorCfg, MotionCfg};
pub use controller::{Admission, ElevatorCore};
pub use dispatch::{Arrival, Stage};
pub use display::Digit;
pub use door::DoorPhase;
pub use error::{BuildError, ControllerError, Report, Result};
pub use floor::{Direction, Floor, Position};
pub use queue::{QueueReject, Request, RequestQueue};
pub use runner::{LoopStats, RunOptions};
pub use status::StepReport;
pub use telemetry::TripCounters;
