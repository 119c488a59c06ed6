use super::flight::{Flight, FlightId};

/// Allocates flight records with strictly increasing ids.
#[derive(Debug)]
pub struct FlightRegistry {
    /// Sequence number handed to the next created flight.
    next_seq: u32,
}

impl FlightRegistry {
    const FIRST_SEQ: u32 = 1;

    pub fn new() -> Self { Self { next_seq: Self::FIRST_SEQ } }

    /// Creates a new flight in [`FlightStatus::Queued`](super::FlightStatus::Queued)
    /// with the default display name `Flight <n>`.
    pub fn create_flight(&mut self) -> Flight {
        let name = format!("Flight {}", self.next_seq);
        self.create_named(name)
    }

    /// Creates a new flight carrying a caller chosen display name.
    pub fn create_named(&mut self, name: String) -> Flight {
        let id = FlightId::new(self.next_seq);
        self.next_seq += 1;
        Flight::new(id, name)
    }

    /// Returns the id the next created flight will receive.
    pub fn peek_next_id(&self) -> FlightId { FlightId::new(self.next_seq) }

    pub fn reset(&mut self) { self.next_seq = Self::FIRST_SEQ; }
}

impl Default for FlightRegistry {
    fn default() -> Self { Self::new() }
}
