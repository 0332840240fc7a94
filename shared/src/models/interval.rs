//! Freshness window lengths.
//!
//! A window length is supplied on the command line as free text and must be
//! validated before any query is built from it.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while validating check input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A supplied parameter is missing or out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

const INTERVAL_MESSAGE: &str = "Critical and Warning interval has to be number (seconds) value";

/// A positive, finite number of seconds.
///
/// # Example
///
/// ```
/// use shared::models::Seconds;
///
/// let window = Seconds::parse(Some("300")).unwrap();
/// assert_eq!(window.to_string(), "300");
///
/// assert!(Seconds::parse(Some("0")).is_err());
/// assert!(Seconds::parse(None).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Seconds(f64);

impl Seconds {
    /// Validates a raw interval value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidParameter`] when the value is absent,
    /// not a number, not finite, zero or negative.
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidParameter(INTERVAL_MESSAGE.to_string());

        let value = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(invalid)?
            .parse::<f64>()
            .map_err(|_| invalid())?;

        Self::new(value).ok_or_else(invalid)
    }

    /// Wraps an already numeric value, rejecting anything not strictly positive.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Returns the raw number of seconds.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Returns the window as a `chrono` duration with millisecond precision,
    /// or `None` when it exceeds the representable range.
    #[must_use]
    pub fn as_duration(self) -> Option<Duration> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let millis = (self.0 * 1000.0).min(i64::MAX as f64) as i64;
        Duration::try_milliseconds(millis)
    }

    /// Returns the start of a window of this length ending at `now`.
    ///
    /// Windows reaching past the earliest representable instant start there.
    #[must_use]
    pub fn window_start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.as_duration()
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl std::fmt::Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_integer() {
        let seconds = Seconds::parse(Some("3600")).unwrap();
        assert!((seconds.as_f64() - 3600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_accepts_float_and_exponent() {
        assert!(Seconds::parse(Some("1.5")).is_ok());
        assert!(Seconds::parse(Some("1e3")).is_ok());
        assert!(Seconds::parse(Some(" 60 ")).is_ok());
    }

    #[test]
    fn test_parse_rejects_absent() {
        assert!(matches!(
            Seconds::parse(None),
            Err(ValidationError::InvalidParameter(_))
        ));
        assert!(Seconds::parse(Some("")).is_err());
        assert!(Seconds::parse(Some("   ")).is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(Seconds::parse(Some("ten")).is_err());
        assert!(Seconds::parse(Some("10s")).is_err());
        assert!(Seconds::parse(Some("inf")).is_err());
        assert!(Seconds::parse(Some("NaN")).is_err());
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        assert!(Seconds::parse(Some("0")).is_err());
        assert!(Seconds::parse(Some("0.0")).is_err());
        assert!(Seconds::parse(Some("-5")).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = Seconds::parse(Some("abc")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: Critical and Warning interval has to be number (seconds) value"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Seconds::parse(Some("300")).unwrap().to_string(), "300");
        assert_eq!(Seconds::parse(Some("300.0")).unwrap().to_string(), "300");
        assert_eq!(Seconds::parse(Some("1.5")).unwrap().to_string(), "1.5");
    }

    #[test]
    fn test_window_start() {
        let now = Utc::now();
        let seconds = Seconds::parse(Some("90")).unwrap();
        assert_eq!(seconds.window_start(now), now - Duration::seconds(90));
    }

    #[test]
    fn test_window_start_saturates() {
        let seconds = Seconds::new(1e300).unwrap();
        assert_eq!(seconds.window_start(Utc::now()), DateTime::<Utc>::MIN_UTC);
    }
}
