use flight_tower::flight_control::Pause;
use flight_tower::status_sink::LogSink;
use flight_tower::{RunOutcome, Tower, TowerConfig, error, fatal, info, log, warn};
use std::sync::Arc;

fn report(label: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Completed { flights } => log!("{label}: completed {} flights.", flights.len()),
        RunOutcome::Skipped(reason) => warn!("{label}: skipped ({reason})."),
        RunOutcome::Interrupted => warn!("{label}: interrupted."),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = TowerConfig::from_env().unwrap_or_else(|e| fatal!("Invalid configuration: {e}"));
    let tower = Arc::new(Tower::from_config(&config, Arc::new(LogSink)));
    info!("Tower online, time scale {}.", config.time_scale());

    for _ in 0..config.demo_flights() {
        tower.add_flight().await;
    }

    let run = {
        let tower_clone = Arc::clone(&tower);
        tokio::spawn(async move { tower_clone.start_takeoff_run().await })
    };
    // give the run time to claim the lock before competing for it
    tokio::time::sleep(tower.timing().duration_of(Pause::Positioning)).await;
    report("Emergency landing during takeoff run", &tower.trigger_emergency_landing().await);
    tower.add_flight_named("Late arrival").await;

    match run.await {
        Ok(outcome) => report("Takeoff run", &outcome),
        Err(e) => error!("Takeoff run task failed: {e}"),
    }
    report("Emergency landing after takeoff run", &tower.trigger_emergency_landing().await);

    info!("Final status: {}.", tower.query_status().await);
    tower.reset().await;
}
