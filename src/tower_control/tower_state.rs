use crate::flight_control::{Flight, FlightId, FlightQueue, FlightRegistry};
use crate::status_sink::SystemStatus;
use tokio_util::sync::CancellationToken;

/// Exclusive right to run one orchestrated sequence.
///
/// A token belongs to the reset epoch it was acquired in. Once that epoch is
/// cancelled by a reset the token is stale: its holder must stop at the next
/// suspension point without touching the state again.
#[derive(Debug)]
pub(crate) struct RunToken {
    epoch: CancellationToken,
}

impl RunToken {
    pub fn is_stale(&self) -> bool { self.epoch.is_cancelled() }
    pub fn epoch(&self) -> &CancellationToken { &self.epoch }
}

/// Id-level view of every container at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TowerSnapshot {
    pub queue: Vec<FlightId>,
    /// Flight currently positioning or taking off.
    pub runway: Option<FlightId>,
    /// Airborne flights in admission order.
    pub airborne: Vec<FlightId>,
    pub completed: Vec<FlightId>,
    pub busy: bool,
    pub next_id: FlightId,
}

impl TowerSnapshot {
    /// Number of containers currently holding `id`.
    pub fn holders_of(&self, id: FlightId) -> usize {
        usize::from(self.queue.contains(&id))
            + usize::from(self.runway == Some(id))
            + usize::from(self.airborne.contains(&id))
            + usize::from(self.completed.contains(&id))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
            && self.runway.is_none()
            && self.airborne.is_empty()
            && self.completed.is_empty()
    }
}

/// Every flight owned by the tower plus the busy lock.
///
/// A flight lives in exactly one of `queue`, `runway`, `airborne` and
/// `completed`. Flights are only ever moved between them, never dropped,
/// except by [`TowerState::reset`].
#[derive(Debug)]
pub(crate) struct TowerState {
    registry: FlightRegistry,
    queue: FlightQueue,
    runway: Option<Flight>,
    airborne: Vec<Flight>,
    completed: Vec<Flight>,
    busy: bool,
    epoch: CancellationToken,
}

impl TowerState {
    pub fn new() -> Self {
        Self {
            registry: FlightRegistry::new(),
            queue: FlightQueue::new(),
            runway: None,
            airborne: Vec::new(),
            completed: Vec::new(),
            busy: false,
            epoch: CancellationToken::new(),
        }
    }

    pub fn registry_mut(&mut self) -> &mut FlightRegistry { &mut self.registry }
    pub fn queue(&self) -> &FlightQueue { &self.queue }
    pub fn queue_mut(&mut self) -> &mut FlightQueue { &mut self.queue }
    pub fn runway_mut(&mut self) -> &mut Option<Flight> { &mut self.runway }
    pub fn airborne(&self) -> &[Flight] { &self.airborne }
    pub fn is_busy(&self) -> bool { self.busy }

    pub fn airborne_mut(&mut self, id: FlightId) -> Option<&mut Flight> {
        self.airborne.iter_mut().find(|f| f.id() == id)
    }

    /// Admits `flight` at the end of the airborne admission order.
    pub fn admit_airborne(&mut self, flight: Flight) { self.airborne.push(flight); }

    /// Takes `id` out of the airborne set, keeping the order of the rest.
    pub fn remove_airborne(&mut self, id: FlightId) -> Option<Flight> {
        let pos = self.airborne.iter().position(|f| f.id() == id)?;
        Some(self.airborne.remove(pos))
    }

    pub fn push_completed(&mut self, flight: Flight) { self.completed.push(flight); }

    /// Looks `id` up in every container.
    pub fn find(&self, id: FlightId) -> Option<&Flight> {
        self.queue
            .iter()
            .chain(self.runway.iter())
            .chain(self.airborne.iter())
            .chain(self.completed.iter())
            .find(|f| f.id() == id)
    }

    /// Sets the busy flag unless it is already held.
    pub fn try_acquire_run(&mut self) -> Option<RunToken> {
        if self.busy {
            return None;
        }
        self.busy = true;
        Some(RunToken { epoch: self.epoch.clone() })
    }

    /// Clears the busy flag, but only for a token of the current epoch: a
    /// sequence outliving a reset must not release a lock it no longer owns.
    pub fn release_run(&mut self, token: &RunToken) {
        if !token.is_stale() {
            self.busy = false;
        }
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            busy: self.busy,
            queue_length: self.queue.len(),
            airborne_count: self.airborne.len(),
            completed_count: self.completed.len(),
        }
    }

    pub fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            queue: self.queue.ids(),
            runway: self.runway.as_ref().map(Flight::id),
            airborne: self.airborne.iter().map(Flight::id).collect(),
            completed: self.completed.iter().map(Flight::id).collect(),
            busy: self.busy,
            next_id: self.registry.peek_next_id(),
        }
    }

    /// Drops every flight, frees the lock and restarts id allocation.
    ///
    /// The current epoch is cancelled, invalidating all outstanding [`RunToken`]s.
    /// Returns whether a sequence held the lock at that moment.
    pub fn reset(&mut self) -> bool {
        let was_busy = self.busy;
        self.epoch.cancel();
        self.epoch = CancellationToken::new();
        self.queue.clear();
        self.runway = None;
        self.airborne.clear();
        self.completed.clear();
        self.busy = false;
        self.registry.reset();
        was_busy
    }
}
