use super::run_outcome::{RunInterrupted, RunOutcome, SkipReason};
use super::tower::Tower;
use super::tower_state::RunToken;
use crate::flight_control::{Flight, FlightId, FlightStatus, Pause};
use crate::{alert, event, info, warn};
use itertools::Itertools;

impl Tower {
    /// Lands every flight airborne at the time of the call, one after another.
    ///
    /// The airborne set is captured once up front; only members of that
    /// snapshot are landed, in their admission order. Each landed flight gets
    /// its ground visual removed after the cleanup delay unless the tower is
    /// reset before.
    ///
    /// # Returns
    /// - [`RunOutcome::Skipped`] if nothing is airborne or another sequence is running.
    /// - [`RunOutcome::Completed`] with the landed flights otherwise.
    /// - [`RunOutcome::Interrupted`] if the tower was reset mid-landing.
    pub async fn trigger_emergency_landing(&self) -> RunOutcome {
        let (token, snapshot) = {
            let mut state = self.lock().await;
            let Some(token) = state.try_acquire_run() else {
                event!("Emergency landing skipped: tower busy.");
                return RunOutcome::Skipped(SkipReason::Busy);
            };
            if state.airborne().is_empty() {
                state.release_run(&token);
                event!("Emergency landing skipped: nothing airborne.");
                return RunOutcome::Skipped(SkipReason::NothingAirborne);
            }
            let snapshot = state.airborne().iter().map(Flight::id).collect::<Vec<_>>();
            alert!("Emergency landing for {}!", snapshot.iter().join(", "));
            self.sink().system_status_changed(state.status());
            (token, snapshot)
        };

        let finished = async {
            let landed = self.land_all(&token, &snapshot).await?;
            let state = self.lock_for(&token).await?;
            Ok::<_, RunInterrupted>((landed, state))
        };
        match finished.await {
            Ok((landed, mut state)) => {
                state.release_run(&token);
                self.sink().system_status_changed(state.status());
                info!("Emergency landing finished, {} flights down.", landed.len());
                RunOutcome::Completed { flights: landed }
            }
            Err(RunInterrupted) => {
                warn!("Emergency landing interrupted by reset.");
                RunOutcome::Interrupted
            }
        }
    }

    async fn land_all(
        &self,
        token: &RunToken,
        snapshot: &[FlightId],
    ) -> Result<Vec<FlightId>, RunInterrupted> {
        let mut landed = Vec::with_capacity(snapshot.len());
        for &id in snapshot {
            if self.land(id, token).await? {
                landed.push(id);
            }
            self.pause(Pause::LandingSpacing, token).await?;
        }
        Ok(landed)
    }

    /// Takes one flight from the airborne set through `landing` into the completed list.
    async fn land(&self, id: FlightId, token: &RunToken) -> Result<bool, RunInterrupted> {
        {
            let mut state = self.lock_for(token).await?;
            let Some(flight) = state.airborne_mut(id) else {
                warn!("{id} is no longer airborne, skipping its landing.");
                return Ok(false);
            };
            if !self.advance(flight, FlightStatus::Landing) {
                return Ok(false);
            }
        }
        self.pause(Pause::LandingDescent, token).await?;

        let mut state = self.lock_for(token).await?;
        let Some(mut flight) = state.remove_airborne(id) else {
            return Ok(false);
        };
        self.advance(&mut flight, FlightStatus::Completed);
        state.push_completed(flight.clone());
        self.sink().system_status_changed(state.status());
        let delay = self.timing().duration_of(Pause::VisualCleanup);
        self.cleanups().schedule(flight, delay).await;
        alert!("{id} landed.");
        Ok(true)
    }
}
