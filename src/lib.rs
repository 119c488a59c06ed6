//! A cooperative flight-control loop for a single runway.
//!
//! Flights are enqueued, taken off one at a time by a takeoff run and
//! completed after an airborne dwell, or pulled down early by an emergency
//! landing. Both orchestrated sequences share one busy lock. Presentation
//! binds to the [`StatusSink`] notifications and drives the [`Tower`]
//! through its request methods.
#![allow(clippy::similar_names, clippy::module_name_repetitions)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]

pub mod flight_control;
pub mod logger;
pub mod status_sink;
mod tower_config;
pub mod tower_control;

pub use flight_control::{Flight, FlightId, FlightStatus, SuspensionClock, Timing};
pub use status_sink::{StatusSink, SystemStatus};
pub use tower_config::{ConfigError, TowerConfig};
pub use tower_control::{RunOutcome, SkipReason, Tower, TowerSnapshot};
