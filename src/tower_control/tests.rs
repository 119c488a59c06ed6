use super::{RunOutcome, SkipReason, Tower};
use crate::flight_control::{
    FlightId, FlightStatus, ImmediateClock, Pause, Timing, TokioClock,
};
use crate::status_sink::{ChannelSink, SystemStatus, TowerEvent};
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, sleep};

/// Tower on the tokio clock with the standard durations; run under paused time.
fn virtual_tower() -> (Arc<Tower>, UnboundedReceiver<TowerEvent>) {
    let (sink, rx) = ChannelSink::new();
    let tower = Tower::new(Arc::new(TokioClock), Timing::standard(), Arc::new(sink));
    (Arc::new(tower), rx)
}

fn instant_tower() -> (Arc<Tower>, UnboundedReceiver<TowerEvent>) {
    let (sink, rx) = ChannelSink::new();
    let tower = Tower::new(Arc::new(ImmediateClock), Timing::instant(), Arc::new(sink));
    (Arc::new(tower), rx)
}

fn fl(seqs: &[u32]) -> Vec<FlightId> { seqs.iter().copied().map(FlightId::new).collect() }

fn drain(rx: &mut UnboundedReceiver<TowerEvent>) -> Vec<TowerEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

fn busy_flags(events: &[TowerEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e {
            TowerEvent::SystemStatusChanged(s) => Some(s.busy),
            _ => None,
        })
        .collect()
}

/// Puts `count` fresh flights straight into the airborne set, as if a takeoff
/// had just admitted them.
async fn seed_airborne(tower: &Tower, count: usize) -> Vec<FlightId> {
    let mut state = tower.lock().await;
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let mut flight = state.registry_mut().create_flight();
        for next in [FlightStatus::Positioning, FlightStatus::TakingOff, FlightStatus::Airborne] {
            flight.advance(next).unwrap();
        }
        ids.push(flight.id());
        state.admit_airborne(flight);
    }
    ids
}

#[tokio::test(start_paused = true)]
async fn test_takeoff_run_completes_in_fifo_order() {
    let (tower, mut rx) = virtual_tower();
    let ids = [tower.add_flight().await, tower.add_flight().await, tower.add_flight().await]
        .iter()
        .map(|f| f.id().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["FL001", "FL002", "FL003"]);

    let start = Instant::now();
    let outcome = tower.start_takeoff_run().await;
    assert_eq!(outcome, RunOutcome::Completed { flights: fl(&[1, 2, 3]) });

    let elapsed = start.elapsed();
    let expected = tower.timing().takeoff_cycle() * 3;
    assert!(elapsed >= expected && elapsed < expected + Duration::from_millis(50));

    let snap = tower.snapshot().await;
    assert_eq!(snap.completed, fl(&[1, 2, 3]));
    assert!(snap.queue.is_empty() && snap.airborne.is_empty() && snap.runway.is_none());
    assert!(!snap.busy);

    let events = drain(&mut rx);
    let flags = busy_flags(&events);
    assert!(flags.contains(&true));
    assert_eq!(flags.last(), Some(&false));
    assert!(matches!(events.last(), Some(TowerEvent::QueueRefreshRequested(q)) if q.is_empty()));
}

#[tokio::test]
async fn test_takeoff_run_on_empty_queue_is_skipped() {
    let (tower, mut rx) = instant_tower();
    let outcome = tower.start_takeoff_run().await;
    assert_eq!(outcome, RunOutcome::Skipped(SkipReason::QueueEmpty));
    assert!(outcome.is_skipped());
    assert!(drain(&mut rx).is_empty());
    assert_eq!(tower.query_status().await, SystemStatus::default());
}

#[tokio::test(start_paused = true)]
async fn test_emergency_landing_is_skipped_during_takeoff_run() {
    let (tower, _rx) = virtual_tower();
    tower.add_flight().await;
    tower.add_flight().await;
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };

    // FL001 is airborne from 3500ms until 7500ms
    sleep(Duration::from_millis(4000)).await;
    let before = tower.snapshot().await;
    assert_eq!(before.airborne, fl(&[1]));
    assert_eq!(before.queue, fl(&[2]));
    assert!(before.busy);

    let outcome = tower.trigger_emergency_landing().await;
    assert_eq!(outcome, RunOutcome::Skipped(SkipReason::Busy));
    assert_eq!(tower.snapshot().await, before);

    let outcome = run.await.unwrap();
    assert_eq!(outcome.flights(), fl(&[1, 2]).as_slice());
}

#[tokio::test(start_paused = true)]
async fn test_emergency_landing_follows_admission_order() {
    let (tower, mut rx) = virtual_tower();
    let seeded = seed_airborne(&tower, 2).await;
    assert_eq!(seeded, fl(&[1, 2]));

    let outcome = tower.trigger_emergency_landing().await;
    assert_eq!(outcome, RunOutcome::Completed { flights: fl(&[1, 2]) });

    let snap = tower.snapshot().await;
    assert_eq!(snap.completed, fl(&[1, 2]));
    assert!(snap.airborne.is_empty());
    assert!(!snap.busy);
    assert_eq!(
        tower.flight(FlightId::new(2)).await.map(|f| f.status()),
        Some(FlightStatus::Completed)
    );

    let events = drain(&mut rx);
    let transitions = events
        .iter()
        .filter_map(|e| match e {
            TowerEvent::FlightStatusChanged { id, old, new } => Some((id.seq(), *old, *new)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        transitions,
        [
            (1, FlightStatus::Airborne, FlightStatus::Landing),
            (1, FlightStatus::Landing, FlightStatus::Completed),
            (2, FlightStatus::Airborne, FlightStatus::Landing),
            (2, FlightStatus::Landing, FlightStatus::Completed),
        ]
    );
    let scheduled = events
        .iter()
        .filter(|e| matches!(e, TowerEvent::VisualCleanupScheduled { .. }))
        .count();
    assert_eq!(scheduled, 2);
}

#[tokio::test(start_paused = true)]
async fn test_reset_after_landing_restarts_ids() {
    let (tower, _rx) = virtual_tower();
    seed_airborne(&tower, 2).await;
    tower.trigger_emergency_landing().await;

    tower.reset().await;
    let once = tower.snapshot().await;
    assert!(once.is_empty());
    assert!(!once.busy);
    assert_eq!(once.next_id, FlightId::new(1));

    tower.reset().await;
    assert_eq!(tower.snapshot().await, once);
    assert_eq!(tower.pending_cleanups().await, 0);
    assert_eq!(tower.add_flight().await.id().to_string(), "FL001");
}

#[tokio::test(start_paused = true)]
async fn test_flights_enqueued_during_landing_are_not_landed() {
    let (tower, _rx) = virtual_tower();
    seed_airborne(&tower, 2).await;
    let landing = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.trigger_emergency_landing().await })
    };
    sleep(Duration::from_millis(100)).await;

    let late = tower.add_flight().await;
    assert_eq!(late.id(), FlightId::new(3));
    assert_eq!(
        tower.start_takeoff_run().await,
        RunOutcome::Skipped(SkipReason::Busy)
    );

    assert_eq!(landing.await.unwrap().flights(), fl(&[1, 2]).as_slice());
    let snap = tower.snapshot().await;
    assert_eq!(snap.queue, fl(&[3]));
    assert_eq!(snap.completed, fl(&[1, 2]));
    assert_eq!(tower.flight(late.id()).await.map(|f| f.status()), Some(FlightStatus::Queued));
}

#[tokio::test(start_paused = true)]
async fn test_enqueue_during_run_joins_that_run() {
    let (tower, _rx) = virtual_tower();
    tower.add_flight().await;
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };
    sleep(Duration::from_millis(1000)).await;
    tower.add_flight_named("Late arrival").await;
    assert_eq!(tower.query_status().await.queue_length, 1);

    let outcome = run.await.unwrap();
    assert_eq!(outcome, RunOutcome::Completed { flights: fl(&[1, 2]) });
    let late = tower.flight(FlightId::new(2)).await.unwrap();
    assert_eq!(late.name(), "Late arrival");
    assert_eq!(late.status(), FlightStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_every_flight_has_exactly_one_holder() {
    let (tower, _rx) = virtual_tower();
    for _ in 0..3 {
        tower.add_flight().await;
    }
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };

    let mut samples = 0;
    while !run.is_finished() {
        let snap = tower.snapshot().await;
        for id in fl(&[1, 2, 3]) {
            assert_eq!(snap.holders_of(id), 1, "{id} at sample {samples}: {snap:?}");
            let status = tower.flight(id).await.unwrap().status();
            assert_eq!(snap.runway == Some(id), status.is_on_ground());
        }
        samples += 1;
        sleep(Duration::from_millis(250)).await;
    }
    assert!(samples > 100);
    assert!(!run.await.unwrap().is_skipped());
}

#[tokio::test(start_paused = true)]
async fn test_reset_interrupts_takeoff_run() {
    let (tower, _rx) = virtual_tower();
    tower.add_flight().await;
    tower.add_flight().await;
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };
    sleep(Duration::from_millis(4000)).await;
    assert!(tower.query_status().await.busy);

    tower.reset().await;
    assert_eq!(run.await.unwrap(), RunOutcome::Interrupted);

    // nothing of the old run may resurface
    sleep(Duration::from_secs(30)).await;
    let snap = tower.snapshot().await;
    assert!(snap.is_empty());
    assert!(!snap.busy);

    tower.add_flight().await;
    let outcome = tower.start_takeoff_run().await;
    assert_eq!(outcome, RunOutcome::Completed { flights: fl(&[1]) });
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_cleanup() {
    let (tower, mut rx) = virtual_tower();
    seed_airborne(&tower, 1).await;
    let landing = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.trigger_emergency_landing().await })
    };

    // landed at 3000ms, cleanup due at 4000ms
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(tower.pending_cleanups().await, 1);
    tower.reset().await;
    assert_eq!(tower.pending_cleanups().await, 0);
    assert_eq!(landing.await.unwrap(), RunOutcome::Interrupted);

    sleep(Duration::from_secs(5)).await;
    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(e, TowerEvent::VisualCleanupScheduled { .. })));
    let cleared_at = events.iter().position(|e| *e == TowerEvent::VisualsCleared).unwrap();
    assert!(
        !events[cleared_at..].iter().any(|e| matches!(e, TowerEvent::VisualRemoveRequested(_)))
    );
}

#[tokio::test(start_paused = true)]
async fn test_cleanup_fires_after_delay() {
    let (tower, mut rx) = virtual_tower();
    seed_airborne(&tower, 1).await;
    tower.trigger_emergency_landing().await;
    sleep(tower.timing().duration_of(Pause::VisualCleanup)).await;

    assert_eq!(tower.pending_cleanups().await, 0);
    let events = drain(&mut rx);
    assert!(events.contains(&TowerEvent::VisualCleanupScheduled {
        id: FlightId::new(1),
        delay: Duration::from_millis(1000),
    }));
    assert!(events.contains(&TowerEvent::VisualRemoveRequested(FlightId::new(1))));
}

#[tokio::test]
async fn test_emergency_landing_with_nothing_airborne_is_skipped() {
    let (tower, mut rx) = instant_tower();
    tower.add_flight().await;
    drain(&mut rx);
    let outcome = tower.trigger_emergency_landing().await;
    assert_eq!(outcome, RunOutcome::Skipped(SkipReason::NothingAirborne));
    assert!(drain(&mut rx).is_empty());
    assert_eq!(tower.query_status().await.queue_length, 1);
}

#[tokio::test]
async fn test_ids_keep_counting_across_runs() {
    let (tower, _rx) = instant_tower();
    tower.add_flight().await;
    tower.add_flight().await;
    tower.start_takeoff_run().await;
    assert_eq!(tower.add_flight().await.id().to_string(), "FL003");
    seed_airborne(&tower, 1).await;
    tower.trigger_emergency_landing().await;
    assert_eq!(tower.add_flight().await.id().to_string(), "FL005");
}

#[tokio::test]
async fn test_long_queue_keeps_fifo_order() {
    let (tower, _rx) = instant_tower();
    for _ in 0..25 {
        tower.add_flight().await;
    }
    let outcome = tower.start_takeoff_run().await;
    let expected = (1..=25).map(FlightId::new).collect::<Vec<_>>();
    assert_eq!(outcome.flights(), expected.as_slice());
    assert_eq!(tower.snapshot().await.completed, expected);
}

#[tokio::test(start_paused = true)]
async fn test_busy_is_reported_before_other_skip_reasons() {
    let (tower, mut rx) = virtual_tower();
    seed_airborne(&tower, 1).await;
    let landing = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.trigger_emergency_landing().await })
    };
    sleep(Duration::from_millis(100)).await;

    // queue is empty, but the landing holds the lock
    assert_eq!(tower.start_takeoff_run().await, RunOutcome::Skipped(SkipReason::Busy));
    assert_eq!(landing.await.unwrap().flights(), fl(&[1]).as_slice());

    tower.add_flight().await;
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };
    sleep(Duration::from_millis(100)).await;
    // nothing airborne yet, FL002 is still positioning
    assert_eq!(tower.trigger_emergency_landing().await, RunOutcome::Skipped(SkipReason::Busy));
    assert_eq!(run.await.unwrap().flights(), fl(&[2]).as_slice());

    drain(&mut rx);
    assert_eq!(tower.start_takeoff_run().await, RunOutcome::Skipped(SkipReason::QueueEmpty));
    assert!(!tower.query_status().await.busy);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_run_waits_for_lock_interrupts() {
    let (tower, mut rx) = virtual_tower();
    tower.add_flight().await;
    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };

    // hold the state across the end of the final spacing, then reset under it
    sleep(Duration::from_millis(9000)).await;
    let mut state = tower.lock().await;
    sleep(Duration::from_millis(1000)).await;
    assert!(state.reset());
    drop(state);

    assert_eq!(run.await.unwrap(), RunOutcome::Interrupted);
    let snap = tower.snapshot().await;
    assert!(snap.is_empty());
    assert!(!snap.busy);
    let events = drain(&mut rx);
    assert!(!events.iter().any(|e| matches!(e, TowerEvent::QueueRefreshRequested(_))));
    assert_eq!(busy_flags(&events).last(), Some(&true));
}
