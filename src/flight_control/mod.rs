//! Leaf building blocks of the tower: flight records and their lifecycle,
//! id allocation, the takeoff queue and the timing model pacing every
//! orchestrated sequence.

mod flight;
mod flight_queue;
mod flight_registry;
mod flight_state;
mod suspension_clock;
mod timing;

pub use flight::{Flight, FlightId};
pub use flight_queue::FlightQueue;
pub use flight_registry::FlightRegistry;
pub use flight_state::{FlightStatus, TransitionError};
pub use suspension_clock::{ImmediateClock, SuspensionClock, TokioClock};
pub use timing::{Pause, Timing};
