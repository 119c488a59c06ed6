use super::sink::{StatusSink, SystemStatus};
use crate::flight_control::{Flight, FlightId, FlightStatus};
use crate::{event, info, log};
use itertools::Itertools;
use std::time::Duration;

/// Sink writing every notification to the console through the crate logger.
///
/// Lifecycle transitions and status updates are only printed with
/// `LOG_TOWER_EVENTS` set.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn flight_enqueued(&self, flight: &Flight) {
        log!("Enqueued {} as \"{}\".", flight.id(), flight.name());
    }

    fn flight_status_changed(&self, flight: &Flight, old: FlightStatus, new: FlightStatus) {
        match new {
            FlightStatus::Airborne => info!("{} is airborne.", flight.id()),
            FlightStatus::Landing => info!("{} is performing an emergency landing.", flight.id()),
            _ => event!("{}: {old} -> {new}", flight.id()),
        }
    }

    fn system_status_changed(&self, status: SystemStatus) { event!("Tower status: {status}."); }

    fn visual_create_requested(&self, flight: &Flight) {
        event!("Ground visual requested for {}.", flight.id());
    }

    fn visual_remove_requested(&self, flight: &Flight) {
        event!("Visual removal requested for {}.", flight.id());
    }

    fn visual_cleanup_scheduled(&self, flight: &Flight, delay: Duration) {
        event!("Cleanup for {} scheduled in {}ms.", flight.id(), delay.as_millis());
    }

    fn queue_refresh_requested(&self, queued: &[FlightId]) {
        if queued.is_empty() {
            event!("Queue refresh: empty.");
        } else {
            event!("Queue refresh: {}.", queued.iter().join(", "));
        }
    }

    fn visuals_cleared(&self) { log!("All visuals cleared."); }
}

#[cfg(test)]
mod tests {
    use super::LogSink;
    use crate::flight_control::{ImmediateClock, Timing};
    use crate::tower_control::{RunOutcome, Tower};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_log_sink_handles_a_full_run() {
        let tower = Tower::new(Arc::new(ImmediateClock), Timing::instant(), Arc::new(LogSink));
        tower.add_flight().await;
        tower.add_flight_named("Late arrival").await;
        let outcome = tower.start_takeoff_run().await;
        assert_eq!(outcome.flights().len(), 2);
        assert!(matches!(outcome, RunOutcome::Completed { .. }));
        tower.reset().await;
        assert!(tower.snapshot().await.is_empty());
    }
}
