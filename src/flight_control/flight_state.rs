use std::collections::HashSet;
use std::sync::LazyLock;
use strum_macros::{Display, EnumIter};

/// Lifecycle state of a single flight.
///
/// The `Display` representation is the lowercase wire name also used by the
/// presentation layer (`queued`, `taking_off`, ...).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FlightStatus {
    Queued,
    Positioning,
    TakingOff,
    Airborne,
    Landing,
    Completed,
}

#[derive(Debug, Display)]
pub enum TransitionError {
    #[strum(to_string = "illegal transition {from} -> {to}")]
    Illegal { from: FlightStatus, to: FlightStatus },
    #[strum(to_string = "flight is already completed")]
    AlreadyCompleted,
}

impl std::error::Error for TransitionError {}

impl FlightStatus {
    /// Returns `true` if `self -> next` is one of the transitions driven by the
    /// takeoff scheduler or the emergency landing controller.
    pub fn can_transition_to(self, next: FlightStatus) -> bool {
        LEGAL_TRANSITIONS.contains(&(self, next))
    }

    /// Checks `self -> next` against the transition table.
    ///
    /// # Errors
    /// - [`TransitionError::AlreadyCompleted`] if `self` is terminal.
    /// - [`TransitionError::Illegal`] for every other pair not in the table.
    pub fn transition(self, next: FlightStatus) -> Result<FlightStatus, TransitionError> {
        if self == FlightStatus::Completed {
            return Err(TransitionError::AlreadyCompleted);
        }
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError::Illegal { from: self, to: next })
        }
    }

    /// A flight in one of these states is held on the runway, not in any of
    /// the queue, airborne or completed containers.
    pub fn is_on_ground(self) -> bool {
        matches!(self, FlightStatus::Positioning | FlightStatus::TakingOff)
    }
}

impl From<FlightStatus> for &'static str {
    fn from(value: FlightStatus) -> Self {
        match value {
            FlightStatus::Queued => "queued",
            FlightStatus::Positioning => "positioning",
            FlightStatus::TakingOff => "taking_off",
            FlightStatus::Airborne => "airborne",
            FlightStatus::Landing => "landing",
            FlightStatus::Completed => "completed",
        }
    }
}

static LEGAL_TRANSITIONS: LazyLock<HashSet<(FlightStatus, FlightStatus)>> = LazyLock::new(|| {
    let mut lookup = HashSet::new();
    let transitions = vec![
        // Takeoff run
        (FlightStatus::Queued, FlightStatus::Positioning),
        (FlightStatus::Positioning, FlightStatus::TakingOff),
        (FlightStatus::TakingOff, FlightStatus::Airborne),
        (FlightStatus::Airborne, FlightStatus::Completed),
        // Emergency landing
        (FlightStatus::Airborne, FlightStatus::Landing),
        (FlightStatus::Landing, FlightStatus::Completed),
    ];

    for pair in transitions {
        lookup.insert(pair);
    }
    lookup
});
