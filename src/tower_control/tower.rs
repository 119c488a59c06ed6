use super::cleanup_registry::CleanupRegistry;
use super::run_outcome::RunInterrupted;
use super::tower_state::{RunToken, TowerSnapshot, TowerState};
use crate::flight_control::{
    Flight, FlightId, FlightStatus, Pause, SuspensionClock, Timing, TokioClock,
};
use crate::status_sink::{StatusSink, SystemStatus};
use crate::tower_config::TowerConfig;
use crate::{error, info};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// The flight control loop: owns every flight and serves the inbound requests
/// of the presentation layer.
///
/// All state lives behind a single async mutex. The guard is only ever held
/// between two suspension points, never across a clock wait, so enqueue
/// requests are served while a takeoff run or emergency landing is suspended.
pub struct Tower {
    state: Mutex<TowerState>,
    clock: Arc<dyn SuspensionClock>,
    timing: Timing,
    sink: Arc<dyn StatusSink>,
    cleanups: CleanupRegistry,
}

impl Tower {
    pub fn new(clock: Arc<dyn SuspensionClock>, timing: Timing, sink: Arc<dyn StatusSink>) -> Self {
        let cleanups = CleanupRegistry::new(Arc::clone(&clock), Arc::clone(&sink));
        Self { state: Mutex::new(TowerState::new()), clock, timing, sink, cleanups }
    }

    /// Creates a real-time tower paced by the configured timing.
    pub fn from_config(config: &TowerConfig, sink: Arc<dyn StatusSink>) -> Self {
        Self::new(Arc::new(TokioClock), config.timing(), sink)
    }

    pub fn timing(&self) -> &Timing { &self.timing }

    /// Creates a new flight and appends it to the takeoff queue.
    ///
    /// Always succeeds, also while a sequence holds the lock.
    pub async fn add_flight(&self) -> Flight {
        let mut state = self.state.lock().await;
        let flight = state.registry_mut().create_flight();
        self.enqueue(&mut state, flight)
    }

    /// Like [`add_flight`](Self::add_flight) with a caller chosen display name.
    pub async fn add_flight_named(&self, name: impl Into<String>) -> Flight {
        let mut state = self.state.lock().await;
        let flight = state.registry_mut().create_named(name.into());
        self.enqueue(&mut state, flight)
    }

    fn enqueue(&self, state: &mut TowerState, flight: Flight) -> Flight {
        state.queue_mut().enqueue(flight.clone());
        self.sink.flight_enqueued(&flight);
        self.sink.system_status_changed(state.status());
        flight
    }

    pub async fn query_status(&self) -> SystemStatus { self.state.lock().await.status() }

    pub async fn snapshot(&self) -> TowerSnapshot { self.state.lock().await.snapshot() }

    /// Current record of `id`, wherever it is held.
    pub async fn flight(&self, id: FlightId) -> Option<Flight> {
        self.state.lock().await.find(id).cloned()
    }

    /// Number of deferred visual cleanups that have not fired yet.
    pub async fn pending_cleanups(&self) -> usize { self.cleanups.pending_count().await }

    /// Returns the tower to its initial state.
    ///
    /// A sequence suspended at this moment is interrupted at its current
    /// suspension point and never touches the state again.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let was_busy = state.reset();
        // under the state lock so a landing cannot schedule a cleanup in between
        let cancelled = self.cleanups.cancel_all().await;
        self.sink.visuals_cleared();
        self.sink.queue_refresh_requested(&[]);
        self.sink.system_status_changed(state.status());
        info!("Tower reset (interrupted run: {was_busy}, cancelled cleanups: {cancelled}).");
    }

    /// Suspends the calling sequence for `pause`, or until its token goes stale.
    pub(crate) async fn pause(&self, pause: Pause, token: &RunToken) -> Result<(), RunInterrupted> {
        let duration = self.timing.duration_of(pause);
        tokio::select! {
            () = token.epoch().cancelled() => Err(RunInterrupted),
            () = self.clock.wait(duration) => {
                if token.is_stale() { Err(RunInterrupted) } else { Ok(()) }
            }
        }
    }

    /// Locks the state on behalf of the holder of `token`.
    pub(crate) async fn lock_for(
        &self,
        token: &RunToken,
    ) -> Result<MutexGuard<'_, TowerState>, RunInterrupted> {
        let state = self.state.lock().await;
        if token.is_stale() { Err(RunInterrupted) } else { Ok(state) }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, TowerState> { self.state.lock().await }

    /// Applies `next` to `flight` and reports the change to the sink.
    ///
    /// Both sequences only request legal transitions; anything else is logged
    /// and leaves the flight where it is.
    pub(crate) fn advance(&self, flight: &mut Flight, next: FlightStatus) -> bool {
        match flight.advance(next) {
            Ok(old) => {
                self.sink.flight_status_changed(flight, old, next);
                true
            }
            Err(e) => {
                error!("Refusing to move {}: {e}", flight.id());
                false
            }
        }
    }

    pub(crate) fn sink(&self) -> &dyn StatusSink { self.sink.as_ref() }

    pub(crate) fn cleanups(&self) -> &CleanupRegistry { &self.cleanups }
}
