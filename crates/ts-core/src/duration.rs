//! Compound worklog duration parsing.
//!
//! Issue trackers report logged time as text such as `"1w 2d 3h 30m"`. Units
//! appear in the fixed order week, day, hour, minute; each is optional. A
//! working week is 40 hours and a working day is 8 hours.

use crate::error::ReportError;

/// Unit markers in scan order, with their length in minutes.
const UNITS: [(char, u64); 4] = [('w', 40 * 60), ('d', 8 * 60), ('h', 60), ('m', 1)];

/// A normalized amount of logged work, stored as whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkDuration {
    minutes: u64,
}

impl WorkDuration {
    /// Parses a compound duration string.
    ///
    /// For each marker in order `w, d, h, m`, the text before the first
    /// occurrence of the marker is the magnitude and the text after it is
    /// scanned for the following units. Text without any marker is zero.
    /// Anything after the minute marker is ignored.
    pub fn parse(text: &str) -> Result<Self, ReportError> {
        let mut remainder = text;
        let mut minutes: u64 = 0;

        for (marker, minutes_per_unit) in UNITS {
            let Some(idx) = remainder.find(marker) else {
                continue;
            };

            let magnitude = parse_magnitude(text, marker, &remainder[..idx])?;
            minutes = magnitude
                .checked_mul(minutes_per_unit)
                .and_then(|unit_minutes| minutes.checked_add(unit_minutes))
                .ok_or_else(|| invalid(text, "duration is too large".to_string()))?;

            remainder = remainder[idx + marker.len_utf8()..].trim();
        }

        Ok(Self { minutes })
    }

    /// Returns the duration in seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.minutes.saturating_mul(60)
    }

    /// Returns the duration as decimal hours.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "logged minutes stay far below 2^52"
    )]
    pub fn hours(self) -> f64 {
        self.minutes as f64 / 60.0
    }
}

/// Parses a compound duration string straight to decimal hours.
pub fn parse_hours(text: &str) -> Result<f64, ReportError> {
    WorkDuration::parse(text).map(WorkDuration::hours)
}

fn parse_magnitude(input: &str, marker: char, raw: &str) -> Result<u64, ReportError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid(input, format!("missing magnitude before '{marker}'")));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(
            input,
            format!("magnitude {raw:?} before '{marker}' is not a non-negative integer"),
        ));
    }
    raw.parse()
        .map_err(|_| invalid(input, format!("magnitude {raw:?} before '{marker}' is too large")))
}

fn invalid(input: &str, reason: String) -> ReportError {
    ReportError::InvalidDurationFormat {
        input: input.to_string(),
        reason,
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "hour values here are exactly representable"
)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_units() {
        assert_eq!(parse_hours("1w 2d 3h 30m").unwrap(), 59.5);
    }

    #[test]
    fn empty_text_is_zero() {
        assert_eq!(parse_hours("").unwrap(), 0.0);
    }

    #[test]
    fn text_without_markers_is_zero() {
        assert_eq!(parse_hours("   ").unwrap(), 0.0);
        assert_eq!(parse_hours("30").unwrap(), 0.0);
    }

    #[test]
    fn single_units() {
        assert_eq!(parse_hours("45m").unwrap(), 0.75);
        assert_eq!(parse_hours("2d").unwrap(), 16.0);
        assert_eq!(parse_hours("1w").unwrap(), 40.0);
        assert_eq!(parse_hours("3h").unwrap(), 3.0);
    }

    #[test]
    fn skipped_units_are_allowed() {
        assert_eq!(parse_hours("1d 30m").unwrap(), 8.5);
        assert_eq!(parse_hours("1w 4h").unwrap(), 44.0);
    }

    #[test]
    fn fractional_minutes() {
        let hours = parse_hours("20m").unwrap();
        assert!((hours - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn seconds_and_hours_accessors() {
        let duration = WorkDuration::parse("1h 30m").unwrap();
        assert_eq!(duration.seconds(), 5400);
        assert_eq!(duration.hours(), 1.5);
        assert_eq!(duration, WorkDuration::parse("90m").unwrap());
    }

    #[test]
    fn whitespace_around_magnitude_is_tolerated() {
        assert_eq!(parse_hours(" 2h").unwrap(), 2.0);
        assert_eq!(parse_hours("1d   4h").unwrap(), 12.0);
    }

    #[test]
    fn trailing_text_after_minutes_is_ignored() {
        assert_eq!(parse_hours("15m extra").unwrap(), 0.25);
    }

    #[test]
    fn missing_magnitude_is_rejected() {
        let err = WorkDuration::parse("h").unwrap_err();
        assert!(matches!(err, ReportError::InvalidDurationFormat { .. }));
        assert!(err.to_string().contains("missing magnitude before 'h'"));
    }

    #[test]
    fn out_of_order_units_are_rejected() {
        // 'h' is found first, leaving "30m 1" as its magnitude.
        let err = WorkDuration::parse("30m 1h").unwrap_err();
        assert!(matches!(err, ReportError::InvalidDurationFormat { .. }));
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        assert!(WorkDuration::parse("-2h").is_err());
    }

    #[test]
    fn sign_prefixed_magnitude_is_rejected() {
        let err = WorkDuration::parse("+5h").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid duration format \"+5h\": magnitude \"+5\" before 'h' is not a non-negative integer"
        );
        assert!(WorkDuration::parse("1d +2h").is_err());
    }

    #[test]
    fn non_numeric_magnitude_is_rejected() {
        let err = WorkDuration::parse("abc 2h").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid duration format \"abc 2h\": magnitude \"abc 2\" before 'h' is not a non-negative integer"
        );
    }

    #[test]
    fn overflow_is_rejected() {
        assert!(WorkDuration::parse("99999999999999999999w").is_err());
        assert!(WorkDuration::parse("9999999999999999w").is_err());
    }
}
