use super::flight_state::{FlightStatus, TransitionError};
use std::fmt::{Display, Formatter};

/// Sequential flight identifier, rendered as `FL` followed by the sequence
/// number zero-padded to three digits.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct FlightId(u32);

impl FlightId {
    pub fn new(seq: u32) -> Self { Self(seq) }
    pub fn seq(self) -> u32 { self.0 }
}

impl Display for FlightId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "FL{:03}", self.0) }
}

/// A single unit of work moving through the tower.
#[derive(Debug, Clone)]
pub struct Flight {
    id: FlightId,
    name: String,
    status: FlightStatus,
}

impl Display for Flight {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) [{}]", self.id, self.name, self.status)
    }
}

impl Flight {
    pub(crate) fn new(id: FlightId, name: String) -> Self {
        Self { id, name, status: FlightStatus::Queued }
    }

    pub fn id(&self) -> FlightId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn status(&self) -> FlightStatus { self.status }

    /// Moves the flight to `next` and returns the status it left.
    ///
    /// # Errors
    /// Propagates the [`TransitionError`] if `next` is not reachable from the
    /// current status. The flight is left untouched in that case.
    pub(crate) fn advance(&mut self, next: FlightStatus) -> Result<FlightStatus, TransitionError> {
        let old = self.status;
        self.status = old.transition(next)?;
        Ok(old)
    }
}
