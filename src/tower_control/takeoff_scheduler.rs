use super::run_outcome::{RunInterrupted, RunOutcome, SkipReason};
use super::tower::Tower;
use super::tower_state::RunToken;
use crate::flight_control::{FlightId, FlightStatus, Pause};
use crate::{event, info, log, warn};
use itertools::Itertools;

impl Tower {
    /// Drains the takeoff queue in FIFO order under the exclusive run lock.
    ///
    /// Every flight is taken through positioning, takeoff and its airborne
    /// dwell before it completes; the next flight only starts after the
    /// takeoff spacing. Flights enqueued while the run is suspended are
    /// picked up by the same run.
    ///
    /// # Returns
    /// - [`RunOutcome::Skipped`] if the queue is empty or another sequence is running.
    /// - [`RunOutcome::Completed`] with the ids of all departed flights otherwise.
    /// - [`RunOutcome::Interrupted`] if the tower was reset mid-run.
    pub async fn start_takeoff_run(&self) -> RunOutcome {
        let token = {
            let mut state = self.lock().await;
            let Some(token) = state.try_acquire_run() else {
                event!("Takeoff run skipped: tower busy.");
                return RunOutcome::Skipped(SkipReason::Busy);
            };
            if state.queue().is_empty() {
                state.release_run(&token);
                event!("Takeoff run skipped: queue empty.");
                return RunOutcome::Skipped(SkipReason::QueueEmpty);
            }
            info!("Starting takeoff run with {} queued flights.", state.queue().len());
            self.sink().system_status_changed(state.status());
            token
        };

        let finished = async {
            let departed = self.drain_queue(&token).await?;
            let state = self.lock_for(&token).await?;
            Ok::<_, RunInterrupted>((departed, state))
        };
        match finished.await {
            Ok((departed, mut state)) => {
                state.release_run(&token);
                self.sink().system_status_changed(state.status());
                self.sink().queue_refresh_requested(&state.queue().ids());
                info!("Takeoff run finished: {}.", departed.iter().join(", "));
                RunOutcome::Completed { flights: departed }
            }
            Err(RunInterrupted) => {
                warn!("Takeoff run interrupted by reset.");
                RunOutcome::Interrupted
            }
        }
    }

    async fn drain_queue(&self, token: &RunToken) -> Result<Vec<FlightId>, RunInterrupted> {
        let mut departed = Vec::new();
        while let Some(id) = self.depart_next(token).await? {
            departed.push(id);
            self.pause(Pause::TakeoffSpacing, token).await?;
        }
        Ok(departed)
    }

    /// Runs the front flight through its takeoff sub-machine, `None` once the queue is empty.
    async fn depart_next(&self, token: &RunToken) -> Result<Option<FlightId>, RunInterrupted> {
        // queued -> positioning: onto the runway
        let id = {
            let mut state = self.lock_for(token).await?;
            let Some(mut flight) = state.queue_mut().dequeue_front() else {
                return Ok(None);
            };
            self.advance(&mut flight, FlightStatus::Positioning);
            self.sink().visual_create_requested(&flight);
            let id = flight.id();
            *state.runway_mut() = Some(flight);
            self.sink().system_status_changed(state.status());
            id
        };
        self.pause(Pause::Positioning, token).await?;

        // positioning -> taking_off
        {
            let mut state = self.lock_for(token).await?;
            if let Some(flight) = state.runway_mut().as_mut() {
                self.advance(flight, FlightStatus::TakingOff);
            }
        }
        self.pause(Pause::TakeoffRoll, token).await?;

        // taking_off -> airborne
        {
            let mut state = self.lock_for(token).await?;
            if let Some(mut flight) = state.runway_mut().take() {
                self.advance(&mut flight, FlightStatus::Airborne);
                state.admit_airborne(flight);
            }
            self.sink().system_status_changed(state.status());
        }
        self.pause(Pause::AirborneDwell, token).await?;

        // airborne -> completed
        {
            let mut state = self.lock_for(token).await?;
            match state.remove_airborne(id) {
                Some(mut flight) => {
                    self.advance(&mut flight, FlightStatus::Completed);
                    self.sink().visual_remove_requested(&flight);
                    state.push_completed(flight);
                    log!("{id} completed its flight.");
                }
                None => warn!("{id} left the airborne set before completing its dwell."),
            }
            self.sink().system_status_changed(state.status());
        }
        Ok(Some(id))
    }
}
