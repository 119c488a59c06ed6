use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Named suspension points of the takeoff and emergency landing sequences.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum Pause {
    Positioning,
    TakeoffRoll,
    AirborneDwell,
    TakeoffSpacing,
    LandingDescent,
    LandingSpacing,
    VisualCleanup,
}

/// Resolved durations for every [`Pause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    positioning: Duration,
    takeoff_roll: Duration,
    airborne_dwell: Duration,
    takeoff_spacing: Duration,
    landing_descent: Duration,
    landing_spacing: Duration,
    visual_cleanup: Duration,
}

impl Timing {
    const POSITIONING: Duration = Duration::from_millis(500);
    const TAKEOFF_ROLL: Duration = Duration::from_millis(3000);
    const AIRBORNE_DWELL: Duration = Duration::from_millis(4000);
    const TAKEOFF_SPACING: Duration = Duration::from_millis(2000);
    const LANDING_DESCENT: Duration = Duration::from_millis(3000);
    const LANDING_SPACING: Duration = Duration::from_millis(1000);
    /// Delay between a completed emergency landing and the removal of its ground visual.
    const VISUAL_CLEANUP: Duration = Duration::from_millis(1000);

    /// The recorded real-time protocol durations.
    pub const fn standard() -> Self {
        Self {
            positioning: Self::POSITIONING,
            takeoff_roll: Self::TAKEOFF_ROLL,
            airborne_dwell: Self::AIRBORNE_DWELL,
            takeoff_spacing: Self::TAKEOFF_SPACING,
            landing_descent: Self::LANDING_DESCENT,
            landing_spacing: Self::LANDING_SPACING,
            visual_cleanup: Self::VISUAL_CLEANUP,
        }
    }

    /// Every pause resolves to zero.
    pub const fn instant() -> Self {
        Self {
            positioning: Duration::ZERO,
            takeoff_roll: Duration::ZERO,
            airborne_dwell: Duration::ZERO,
            takeoff_spacing: Duration::ZERO,
            landing_descent: Duration::ZERO,
            landing_spacing: Duration::ZERO,
            visual_cleanup: Duration::ZERO,
        }
    }

    /// The standard durations multiplied by `factor`.
    ///
    /// Returns `None` if `factor` is not finite and positive, or if the scaled
    /// durations (summed over every pause) no longer fit a [`Duration`].
    pub fn try_scaled(factor: f64) -> Option<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        let std = Self::standard();
        let total = Pause::iter().map(|p| std.duration_of(p)).sum::<Duration>();
        Duration::try_from_secs_f64(total.as_secs_f64() * factor).ok()?;
        let scale = |d: Duration| Duration::from_secs_f64(d.as_secs_f64() * factor);
        Some(Self {
            positioning: scale(std.positioning),
            takeoff_roll: scale(std.takeoff_roll),
            airborne_dwell: scale(std.airborne_dwell),
            takeoff_spacing: scale(std.takeoff_spacing),
            landing_descent: scale(std.landing_descent),
            landing_spacing: scale(std.landing_spacing),
            visual_cleanup: scale(std.visual_cleanup),
        })
    }

    pub fn duration_of(&self, pause: Pause) -> Duration {
        match pause {
            Pause::Positioning => self.positioning,
            Pause::TakeoffRoll => self.takeoff_roll,
            Pause::AirborneDwell => self.airborne_dwell,
            Pause::TakeoffSpacing => self.takeoff_spacing,
            Pause::LandingDescent => self.landing_descent,
            Pause::LandingSpacing => self.landing_spacing,
            Pause::VisualCleanup => self.visual_cleanup,
        }
    }

    /// Time one flight occupies a takeoff run, spacing included.
    pub fn takeoff_cycle(&self) -> Duration {
        self.positioning + self.takeoff_roll + self.airborne_dwell + self.takeoff_spacing
    }
}

impl Default for Timing {
    fn default() -> Self { Self::standard() }
}
