use super::sink::{StatusSink, SystemStatus};
use crate::flight_control::{Flight, FlightId, FlightStatus};
use std::time::Duration;
use strum_macros::Display;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Owned form of every [`StatusSink`] notification.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TowerEvent {
    FlightEnqueued { id: FlightId, name: String },
    FlightStatusChanged { id: FlightId, old: FlightStatus, new: FlightStatus },
    SystemStatusChanged(SystemStatus),
    VisualCreateRequested(FlightId),
    VisualRemoveRequested(FlightId),
    VisualCleanupScheduled { id: FlightId, delay: Duration },
    QueueRefreshRequested(Vec<FlightId>),
    VisualsCleared,
}

/// Sink that turns notifications into [`TowerEvent`]s on an unbounded channel.
///
/// Sending never blocks; events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<TowerEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, UnboundedReceiver<TowerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: TowerEvent) { self.tx.send(event).ok(); }
}

impl StatusSink for ChannelSink {
    fn flight_enqueued(&self, flight: &Flight) {
        self.send(TowerEvent::FlightEnqueued { id: flight.id(), name: flight.name().to_string() });
    }

    fn flight_status_changed(&self, flight: &Flight, old: FlightStatus, new: FlightStatus) {
        self.send(TowerEvent::FlightStatusChanged { id: flight.id(), old, new });
    }

    fn system_status_changed(&self, status: SystemStatus) {
        self.send(TowerEvent::SystemStatusChanged(status));
    }

    fn visual_create_requested(&self, flight: &Flight) {
        self.send(TowerEvent::VisualCreateRequested(flight.id()));
    }

    fn visual_remove_requested(&self, flight: &Flight) {
        self.send(TowerEvent::VisualRemoveRequested(flight.id()));
    }

    fn visual_cleanup_scheduled(&self, flight: &Flight, delay: Duration) {
        self.send(TowerEvent::VisualCleanupScheduled { id: flight.id(), delay });
    }

    fn queue_refresh_requested(&self, queued: &[FlightId]) {
        self.send(TowerEvent::QueueRefreshRequested(queued.to_vec()));
    }

    fn visuals_cleared(&self) { self.send(TowerEvent::VisualsCleared); }
}
