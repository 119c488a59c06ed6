use crate::flight_control::FlightId;
use strum_macros::Display;

/// Why an orchestrated request had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SkipReason {
    /// Another takeoff run or emergency landing holds the lock.
    Busy,
    QueueEmpty,
    NothingAirborne,
}

/// Result of a takeoff run or emergency landing request.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RunOutcome {
    /// The sequence ran to exhaustion; `flights` lists the processed flights in order.
    Completed { flights: Vec<FlightId> },
    /// Preconditions unmet, nothing changed.
    Skipped(SkipReason),
    /// A reset happened while the sequence was suspended.
    Interrupted,
}

impl RunOutcome {
    pub fn is_skipped(&self) -> bool { matches!(self, RunOutcome::Skipped(_)) }

    pub fn flights(&self) -> &[FlightId] {
        match self {
            RunOutcome::Completed { flights } => flights,
            _ => &[],
        }
    }
}

/// Raised at a suspension point whose run token went stale.
#[derive(Debug)]
pub(crate) struct RunInterrupted;
