use crate::flight_control::{Flight, FlightId, FlightStatus};
use std::{fmt::Display, sync::Arc, time::Duration};

/// Aggregate counters pushed with every system status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemStatus {
    pub busy: bool,
    pub queue_length: usize,
    pub airborne_count: usize,
    pub completed_count: usize,
}

impl Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = if self.busy { "busy" } else { "idle" };
        write!(
            f,
            "{mode}, {} queued, {} airborne, {} completed",
            self.queue_length, self.airborne_count, self.completed_count
        )
    }
}

/// Outbound notification boundary between the tower and its presentation.
///
/// Every notification is delivered synchronously from within the tower while
/// the state change it reports is already applied. Implementations must not
/// block. All methods default to doing nothing so a presentation only
/// implements what it renders.
pub trait StatusSink: Send + Sync {
    fn flight_enqueued(&self, _flight: &Flight) {}
    fn flight_status_changed(&self, _flight: &Flight, _old: FlightStatus, _new: FlightStatus) {}
    fn system_status_changed(&self, _status: SystemStatus) {}
    /// A ground presence for `flight` should be created.
    fn visual_create_requested(&self, _flight: &Flight) {}
    fn visual_remove_requested(&self, _flight: &Flight) {}
    /// The ground visual of `flight` will be removed after `delay` unless reset first.
    fn visual_cleanup_scheduled(&self, _flight: &Flight, _delay: Duration) {}
    /// The waiting queue should be redrawn, `queued` is in processing order.
    fn queue_refresh_requested(&self, _queued: &[FlightId]) {}
    fn visuals_cleared(&self) {}
}

/// Sink discarding every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {}

/// Forwards every notification to each of its sinks in registration order.
#[derive(Default, Clone)]
pub struct FanOutSink {
    sinks: Vec<Arc<dyn StatusSink>>,
}

impl FanOutSink {
    pub fn new() -> Self { Self { sinks: Vec::new() } }

    #[must_use]
    pub fn with(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl StatusSink for FanOutSink {
    fn flight_enqueued(&self, flight: &Flight) {
        self.sinks.iter().for_each(|s| s.flight_enqueued(flight));
    }

    fn flight_status_changed(&self, flight: &Flight, old: FlightStatus, new: FlightStatus) {
        self.sinks.iter().for_each(|s| s.flight_status_changed(flight, old, new));
    }

    fn system_status_changed(&self, status: SystemStatus) {
        self.sinks.iter().for_each(|s| s.system_status_changed(status));
    }

    fn visual_create_requested(&self, flight: &Flight) {
        self.sinks.iter().for_each(|s| s.visual_create_requested(flight));
    }

    fn visual_remove_requested(&self, flight: &Flight) {
        self.sinks.iter().for_each(|s| s.visual_remove_requested(flight));
    }

    fn visual_cleanup_scheduled(&self, flight: &Flight, delay: Duration) {
        self.sinks.iter().for_each(|s| s.visual_cleanup_scheduled(flight, delay));
    }

    fn queue_refresh_requested(&self, queued: &[FlightId]) {
        self.sinks.iter().for_each(|s| s.queue_refresh_requested(queued));
    }

    fn visuals_cleared(&self) { self.sinks.iter().for_each(|s| s.visuals_cleared()); }
}

#[cfg(test)]
mod tests {
    use super::{FanOutSink, NullSink, StatusSink, SystemStatus};
    use crate::flight_control::FlightRegistry;
    use crate::status_sink::{ChannelSink, TowerEvent};
    use std::sync::Arc;

    #[test]
    fn test_fan_out_reaches_every_sink_in_order() {
        let (first, mut first_rx) = ChannelSink::new();
        let (second, mut second_rx) = ChannelSink::new();
        let fan_out = FanOutSink::new()
            .with(Arc::new(first))
            .with(Arc::new(NullSink))
            .with(Arc::new(second));

        let flight = FlightRegistry::new().create_flight();
        fan_out.flight_enqueued(&flight);
        fan_out.visuals_cleared();

        for rx in [&mut first_rx, &mut second_rx] {
            let got = std::iter::from_fn(|| rx.try_recv().ok()).collect::<Vec<_>>();
            assert_eq!(
                got,
                [
                    TowerEvent::FlightEnqueued { id: flight.id(), name: String::from("Flight 1") },
                    TowerEvent::VisualsCleared,
                ]
            );
        }
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.system_status_changed(SystemStatus::default());
    }

    #[test]
    fn test_system_status_display() {
        let status = SystemStatus { busy: true, queue_length: 2, airborne_count: 1, completed_count: 0 };
        assert_eq!(status.to_string(), "busy, 2 queued, 1 airborne, 0 completed");
    }
}
