use crate::event;
use crate::flight_control::{Flight, FlightId, SuspensionClock};
use crate::status_sink::StatusSink;
use std::{collections::HashSet, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

struct PendingCleanups {
    /// Shared by every cleanup scheduled since the last [`CleanupRegistry::cancel_all`].
    c_tok: CancellationToken,
    pending: HashSet<FlightId>,
}

/// Tracks deferred ground visual removals so a reset can cancel them.
pub(crate) struct CleanupRegistry {
    inner: Arc<Mutex<PendingCleanups>>,
    clock: Arc<dyn SuspensionClock>,
    sink: Arc<dyn StatusSink>,
}

impl CleanupRegistry {
    pub fn new(clock: Arc<dyn SuspensionClock>, sink: Arc<dyn StatusSink>) -> Self {
        let inner = PendingCleanups { c_tok: CancellationToken::new(), pending: HashSet::new() };
        Self { inner: Arc::new(Mutex::new(inner)), clock, sink }
    }

    /// Requests removal of the ground visual of `flight` once `delay` has passed.
    ///
    /// Fire and forget: the removal runs on its own task and is skipped
    /// entirely if [`cancel_all`](Self::cancel_all) is called first.
    pub async fn schedule(&self, flight: Flight, delay: Duration) {
        let c_tok = {
            let mut inner = self.inner.lock().await;
            inner.pending.insert(flight.id());
            inner.c_tok.clone()
        };
        self.sink.visual_cleanup_scheduled(&flight, delay);
        let inner = Arc::clone(&self.inner);
        let clock = Arc::clone(&self.clock);
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            tokio::select! {
                () = c_tok.cancelled() => {}
                () = clock.wait(delay) => {
                    let mut pending = inner.lock().await;
                    // cancel_all may have run between the wait and the lock
                    if c_tok.is_cancelled() {
                        return;
                    }
                    pending.pending.remove(&flight.id());
                    sink.visual_remove_requested(&flight);
                    event!("Ground visual of {} cleaned up.", flight.id());
                }
            }
        });
    }

    /// Cancels every outstanding cleanup and returns how many were pending.
    pub async fn cancel_all(&self) -> usize {
        let mut inner = self.inner.lock().await;
        inner.c_tok.cancel();
        inner.c_tok = CancellationToken::new();
        let count = inner.pending.len();
        inner.pending.clear();
        count
    }

    pub async fn pending_count(&self) -> usize { self.inner.lock().await.pending.len() }
}
