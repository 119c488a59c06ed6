use super::flight::{Flight, FlightId};
use std::collections::VecDeque;

/// FIFO queue of flights waiting for a takeoff run.
///
/// Insertion order is processing order; there is no reordering or priority.
/// The queue itself is not synchronized, it lives inside the tower state
/// and is only touched while that lock is held.
#[derive(Debug, Default)]
pub struct FlightQueue {
    /// The queue storing waiting flights.
    queue: VecDeque<Flight>,
}

impl FlightQueue {
    /// Creates a new, empty `FlightQueue`.
    pub fn new() -> Self { Self { queue: VecDeque::new() } }

    /// Adds a new flight to the back of the queue.
    ///
    /// # Arguments
    /// - `flight`: The `Flight` to add.
    pub fn enqueue(&mut self, flight: Flight) { self.queue.push_back(flight); }

    /// Removes and returns the flight at the front of the queue.
    ///
    /// # Returns
    /// - An `Option<Flight>` containing the removed flight, or `None` if the queue is empty.
    pub fn dequeue_front(&mut self) -> Option<Flight> { self.queue.pop_front() }

    /// Returns a reference to the flight at the front of the queue without removing it.
    pub fn front(&self) -> Option<&Flight> { self.queue.front() }

    /// Returns the length of the queue.
    pub fn len(&self) -> usize { self.queue.len() }

    /// Checks if the queue is empty.
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    /// Clears all flights from the queue.
    pub fn clear(&mut self) { self.queue.clear(); }

    /// Returns the ids of all waiting flights in processing order.
    pub fn ids(&self) -> Vec<FlightId> { self.queue.iter().map(Flight::id).collect() }

    pub fn iter(&self) -> impl Iterator<Item = &Flight> { self.queue.iter() }
}
