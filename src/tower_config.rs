use crate::flight_control::Timing;
use std::env;
use strum_macros::Display;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerConfig {
    /// Multiplier applied to every pause duration.
    time_scale: f64,
    /// Number of flights the demo binary enqueues.
    demo_flights: usize,
    /// Pause durations resolved from `time_scale`.
    timing: Timing,
}

#[derive(Debug, Display)]
pub enum ConfigError {
    #[strum(to_string = "TOWER_TIME_SCALE must be a positive number small enough to scale every pause, got \"{raw}\"")]
    InvalidTimeScale { raw: String },
    #[strum(to_string = "TOWER_DEMO_FLIGHTS must be a non-negative integer, got \"{raw}\"")]
    InvalidFlightCount { raw: String },
}

impl std::error::Error for ConfigError {}

impl TowerConfig {
    pub const TIME_SCALE_VAR: &'static str = "TOWER_TIME_SCALE";
    pub const DEMO_FLIGHTS_VAR: &'static str = "TOWER_DEMO_FLIGHTS";
    const DEF_TIME_SCALE: f64 = 1.0;
    const DEF_DEMO_FLIGHTS: usize = 3;

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|key| env::var(key).ok()) }

    /// Builds the configuration from an arbitrary key lookup; unset keys fall
    /// back to their defaults.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a present value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let (time_scale, timing) = match lookup(Self::TIME_SCALE_VAR) {
            None => (Self::DEF_TIME_SCALE, Timing::standard()),
            Some(raw) => match raw.trim().parse::<f64>().map(|v| (v, Timing::try_scaled(v))) {
                Ok((v, Some(timing))) => (v, timing),
                _ => return Err(ConfigError::InvalidTimeScale { raw }),
            },
        };
        let demo_flights = match lookup(Self::DEMO_FLIGHTS_VAR) {
            None => Self::DEF_DEMO_FLIGHTS,
            Some(raw) => {
                raw.trim().parse::<usize>().map_err(|_| ConfigError::InvalidFlightCount { raw })?
            }
        };
        Ok(Self { time_scale, demo_flights, timing })
    }

    pub fn time_scale(&self) -> f64 { self.time_scale }
    pub fn demo_flights(&self) -> usize { self.demo_flights }

    /// Pause durations scaled by the configured factor.
    pub fn timing(&self) -> Timing { self.timing }
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            time_scale: Self::DEF_TIME_SCALE,
            demo_flights: Self::DEF_DEMO_FLIGHTS,
            timing: Timing::standard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TowerConfig};
    use crate::flight_control::{Pause, Timing};
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = TowerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TowerConfig::default());
        assert_eq!(config.timing(), Timing::standard());
        assert_eq!(config.demo_flights(), 3);
    }

    #[test]
    fn test_time_scale_applies_to_timing() {
        let config = TowerConfig::from_lookup(lookup_from(&[("TOWER_TIME_SCALE", " 0.1 ")])).unwrap();
        assert!((config.time_scale() - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.timing().duration_of(Pause::TakeoffRoll), Duration::from_millis(300));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for bad in ["0", "-2", "fast", "NaN", "inf", "1e300"] {
            let res = TowerConfig::from_lookup(lookup_from(&[("TOWER_TIME_SCALE", bad)]));
            assert!(matches!(res, Err(ConfigError::InvalidTimeScale { .. })), "{bad} was accepted");
        }
        let res = TowerConfig::from_lookup(lookup_from(&[("TOWER_DEMO_FLIGHTS", "-1")]));
        let err = res.unwrap_err();
        assert_eq!(err.to_string(), "TOWER_DEMO_FLIGHTS must be a non-negative integer, got \"-1\"");
    }

    #[test]
    fn test_overflowing_time_scale_reports_error() {
        let res = TowerConfig::from_lookup(lookup_from(&[("TOWER_TIME_SCALE", "1e300")]));
        let err = res.unwrap_err();
        assert!(err.to_string().contains("\"1e300\""), "unexpected message: {err}");

        let large_scale = TowerConfig::from_lookup(lookup_from(&[("TOWER_TIME_SCALE", "1e6")])).unwrap();
        assert_eq!(
            large_scale.timing().duration_of(Pause::AirborneDwell),
            Duration::from_secs(4_000_000)
        );
    }
}
