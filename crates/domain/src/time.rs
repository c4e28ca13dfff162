//! Time, timestamp and duration helpers.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// UTC timestamp attached to events.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Convert a number of seconds coming from configuration or a planner into
/// a [`Duration`].
///
/// Returns `None` for negative, NaN or infinite input.
#[must_use]
pub fn seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs).ok()
}

/// Serde adapter storing a [`Duration`] as fractional seconds.
///
/// Use with `#[serde(with = "crate::time::secs_f64")]`.
pub mod secs_f64 {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Serialize as an `f64` number of seconds.
    ///
    /// # Errors
    ///
    /// Propagates the serializer's error.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    /// Deserialize from an `f64` number of seconds.
    ///
    /// # Errors
    ///
    /// Fails on negative or non-finite input.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        super::seconds(secs).ok_or_else(|| {
            de::Error::custom(format!("expected a non-negative number of seconds, got {secs}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_convert_fractional_seconds() {
        assert_eq!(seconds(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(seconds(0.0), Some(Duration::ZERO));
    }

    #[test]
    fn should_reject_negative_or_non_finite_seconds() {
        assert_eq!(seconds(-1.0), None);
        assert_eq!(seconds(f64::NAN), None);
        assert_eq!(seconds(f64::INFINITY), None);
    }
}
