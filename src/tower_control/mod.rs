//! The orchestrated sequences of the tower and the state they drive.
//!
//! [`Tower`] owns the flight containers and the busy lock. The takeoff
//! scheduler and the emergency landing controller are both `impl Tower`
//! blocks competing for that lock; only one of them may run at a time.

mod cleanup_registry;
mod emergency_controller;
mod run_outcome;
mod takeoff_scheduler;
mod tower;
mod tower_state;
#[cfg(test)]
mod tests;

pub use run_outcome::{RunOutcome, SkipReason};
pub use tower::Tower;
pub use tower_state::TowerSnapshot;
