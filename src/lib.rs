#![cfg_attr(not(test), no_std)]

//! Control core for a stepper-driven animatronic hand.
//!
//! The hand closes when touched, holds briefly after a release, and never
//! sits still: a slow beckoning sweep while open, randomized wiggle while
//! closed. Touch polarity is unknown at build time (whether contact raises
//! or lowers the capacitive reading is inferred at runtime against a rolling
//! baseline), and the coordinate system is anchored by homing against a
//! limit switch, with on-the-fly re-anchoring whenever the switch is seen
//! mid-run.
//!
//! Everything hardware lives behind the traits in [`hal`]; the core itself
//! is a single-threaded polling loop driven through
//! [`HandController::tick`], with wall-clock time injected as milliseconds.

pub mod calibration;
pub mod config;
pub mod controller;
pub mod gesture;
pub mod hal;
pub mod hand;
pub mod telemetry;
pub mod timer;
pub mod touch;
pub mod trace;
pub mod types;

pub use calibration::CalibrationFault;
pub use config::{
    ConfigError, MotionProfile, MotorConfig, TouchConfig, REFERENCE_MOTOR, REFERENCE_TOUCH,
};
pub use controller::HandController;
pub use gesture::{lerp_i32, ComeHere, Mulberry32, Wiggle};
pub use hand::{HandEngine, MotionRequest};
pub use timer::IntervalTimer;
pub use touch::{TouchClassifier, TouchSnapshot, TOUCH_STACK_CAP};
pub use trace::{plot_line, PlotTrace, PLOT_LINE_CAP};
pub use types::{Direction, HandCommand, HandState, TickReport};
