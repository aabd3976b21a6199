//! Core flight types for airfield.
//!
//! A [`Flight`] is a time-of-day arrival/departure pair under a caller-chosen
//! identifier. Its [`SuccessStatus`] is decided once, by the registry, when
//! the flight is admitted.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// Outcome of admission for a single flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessStatus {
    /// Not yet admitted.
    #[default]
    Missing,
    /// Admitted within capacity and with enough ground time.
    Success,
    /// Rejected by one of the admission rules.
    Fail,
}

impl SuccessStatus {
    /// Lower-case name used in CSV files and service responses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Success => "success",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for SuccessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single flight record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    /// Caller-supplied identifier, unique within a registry.
    pub flight_id: String,

    /// Arrival time of day.
    pub arrival: NaiveTime,

    /// Departure time of day.
    pub departure: NaiveTime,

    success: SuccessStatus,
}

impl Flight {
    /// Create a flight that has not been admitted yet.
    #[must_use]
    pub fn new(flight_id: impl Into<String>, arrival: NaiveTime, departure: NaiveTime) -> Self {
        Self {
            flight_id: flight_id.into(),
            arrival,
            departure,
            success: SuccessStatus::Missing,
        }
    }

    /// The admission outcome recorded for this flight.
    #[must_use]
    pub fn success(&self) -> SuccessStatus {
        self.success
    }

    pub(crate) fn set_success(&mut self, success: SuccessStatus) {
        self.success = success;
    }

    /// Time spent on the ground, `departure - arrival`.
    ///
    /// Both ends are placed on the same day, so a departure earlier in the
    /// day than the arrival yields a negative duration.
    #[must_use]
    pub fn ground_time(&self) -> Duration {
        self.departure.signed_duration_since(self.arrival)
    }
}

impl std::fmt::Display for Flight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let minutes = self.ground_time().num_minutes();
        let sign = if minutes < 0 { "-" } else { "" };
        let minutes = minutes.abs();
        write!(
            f,
            "{}: {}-{} (ground time: {sign}{}h{:02}m): {}",
            self.flight_id,
            self.arrival.format("%H:%M"),
            self.departure.format("%H:%M"),
            minutes / 60,
            minutes % 60,
            self.success
        )
    }
}
