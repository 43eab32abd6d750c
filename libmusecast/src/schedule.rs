//! Schedule descriptor parsing
//!
//! A descriptor is either the literal `immediate` or `every_<N>_<unit>`
//! with a positive count and a minute/hour/day unit (plural accepted).
//! Parsing is all-or-nothing: anything else is an error, never a
//! best-effort interpretation.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalUnit {
    Minute,
    Hour,
    Day,
}

impl IntervalUnit {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "minute" | "minutes" => Some(IntervalUnit::Minute),
            "hour" | "hours" => Some(IntervalUnit::Hour),
            "day" | "days" => Some(IntervalUnit::Day),
            _ => None,
        }
    }

    pub fn as_secs(&self) -> u64 {
        match self {
            IntervalUnit::Minute => 60,
            IntervalUnit::Hour => 60 * 60,
            IntervalUnit::Day => 24 * 60 * 60,
        }
    }
}

impl std::fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalUnit::Minute => write!(f, "minute"),
            IntervalUnit::Hour => write!(f, "hour"),
            IntervalUnit::Day => write!(f, "day"),
        }
    }
}

/// A parsed schedule: post once now, or repeat on a fixed cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleSpec {
    Immediate,
    Recurring { unit: IntervalUnit, count: u64 },
}

impl ScheduleSpec {
    /// Parse a schedule descriptor string.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidFormat` for any descriptor that is
    /// not `immediate` or a well-formed `every_<N>_<unit>`.
    pub fn parse(descriptor: &str) -> Result<Self, ScheduleError> {
        let descriptor = descriptor.trim();

        if descriptor == "immediate" {
            return Ok(ScheduleSpec::Immediate);
        }

        let invalid = || ScheduleError::InvalidFormat(descriptor.to_string());

        let rest = descriptor.strip_prefix("every_").ok_or_else(invalid)?;
        let (count_str, unit_str) = rest.split_once('_').ok_or_else(invalid)?;

        let count: u64 = count_str.parse().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }

        let unit = IntervalUnit::from_token(unit_str).ok_or_else(invalid)?;

        // Interval must fit in u64 seconds
        if unit.as_secs().checked_mul(count).is_none() {
            return Err(invalid());
        }

        Ok(ScheduleSpec::Recurring { unit, count })
    }

    /// The repeat interval, or `None` for an immediate schedule.
    pub fn interval(&self) -> Option<Duration> {
        match self {
            ScheduleSpec::Immediate => None,
            ScheduleSpec::Recurring { unit, count } => {
                Some(Duration::from_secs(unit.as_secs().saturating_mul(*count)))
            }
        }
    }
}

impl FromStr for ScheduleSpec {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScheduleSpec::parse(s)
    }
}

impl std::fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleSpec::Immediate => write!(f, "immediate"),
            ScheduleSpec::Recurring { unit, count } => {
                if *count == 1 {
                    write!(f, "every {}", unit)
                } else {
                    write!(f, "every {} {}s", count, unit)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_immediate() {
        assert_eq!(
            ScheduleSpec::parse("immediate").unwrap(),
            ScheduleSpec::Immediate
        );
    }

    #[test]
    fn test_parse_immediate_with_whitespace() {
        assert_eq!(
            ScheduleSpec::parse("  immediate ").unwrap(),
            ScheduleSpec::Immediate
        );
    }

    #[test]
    fn test_parse_every_2_hours() {
        assert_eq!(
            ScheduleSpec::parse("every_2_hours").unwrap(),
            ScheduleSpec::Recurring {
                unit: IntervalUnit::Hour,
                count: 2
            }
        );
    }

    #[test]
    fn test_parse_every_1_minute_singular() {
        assert_eq!(
            ScheduleSpec::parse("every_1_minute").unwrap(),
            ScheduleSpec::Recurring {
                unit: IntervalUnit::Minute,
                count: 1
            }
        );
    }

    #[test]
    fn test_parse_singular_and_plural_normalize() {
        assert_eq!(
            ScheduleSpec::parse("every_1_hour").unwrap(),
            ScheduleSpec::parse("every_1_hours").unwrap()
        );
        assert_eq!(
            ScheduleSpec::parse("every_3_days").unwrap(),
            ScheduleSpec::Recurring {
                unit: IntervalUnit::Day,
                count: 3
            }
        );
    }

    #[test]
    fn test_parse_zero_count_rejected() {
        let result = ScheduleSpec::parse("every_0_days");
        assert_eq!(
            result,
            Err(ScheduleError::InvalidFormat("every_0_days".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_shape_rejected() {
        let result = ScheduleSpec::parse("hourly");
        assert_eq!(
            result,
            Err(ScheduleError::InvalidFormat("hourly".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_unit_rejected() {
        let result = ScheduleSpec::parse("every_2_fortnights");
        assert_eq!(
            result,
            Err(ScheduleError::InvalidFormat(
                "every_2_fortnights".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_non_numeric_count_rejected() {
        assert!(ScheduleSpec::parse("every_two_hours").is_err());
        assert!(ScheduleSpec::parse("every_-1_hours").is_err());
    }

    #[test]
    fn test_parse_missing_parts_rejected() {
        assert!(ScheduleSpec::parse("every_5").is_err());
        assert!(ScheduleSpec::parse("every_").is_err());
        assert!(ScheduleSpec::parse("").is_err());
    }

    #[test]
    fn test_parse_overflowing_count_rejected() {
        // Grammar-valid but the interval exceeds u64 seconds
        let descriptor = "every_300000000000000000_days";
        assert_eq!(
            ScheduleSpec::parse(descriptor),
            Err(ScheduleError::InvalidFormat(descriptor.to_string()))
        );
        assert!(ScheduleSpec::parse(&format!("every_{}_minutes", u64::MAX)).is_err());
    }

    #[test]
    fn test_interval_saturates_on_hand_built_value() {
        // Variant fields are public; a value built around the parser
        // must still never panic
        let spec = ScheduleSpec::Recurring {
            unit: IntervalUnit::Day,
            count: u64::MAX,
        };
        assert_eq!(spec.interval(), Some(Duration::from_secs(u64::MAX)));
    }

    #[test]
    fn test_parse_no_partial_match() {
        // Trailing garbage after a valid unit must fail whole
        assert!(ScheduleSpec::parse("every_2_hours_extra").is_err());
        assert!(ScheduleSpec::parse("immediately").is_err());
    }

    #[test]
    fn test_from_str_round_trip() {
        let spec: ScheduleSpec = "every_30_minutes".parse().unwrap();
        assert_eq!(
            spec,
            ScheduleSpec::Recurring {
                unit: IntervalUnit::Minute,
                count: 30
            }
        );
    }

    #[test]
    fn test_interval_durations() {
        assert_eq!(ScheduleSpec::parse("immediate").unwrap().interval(), None);
        assert_eq!(
            ScheduleSpec::parse("every_1_minute").unwrap().interval(),
            Some(Duration::from_secs(60))
        );
        assert_eq!(
            ScheduleSpec::parse("every_2_hours").unwrap().interval(),
            Some(Duration::from_secs(7200))
        );
        assert_eq!(
            ScheduleSpec::parse("every_1_day").unwrap().interval(),
            Some(Duration::from_secs(86400))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ScheduleSpec::Immediate.to_string(), "immediate");
        assert_eq!(
            ScheduleSpec::parse("every_1_hour").unwrap().to_string(),
            "every hour"
        );
        assert_eq!(
            ScheduleSpec::parse("every_30_minutes").unwrap().to_string(),
            "every 30 minutes"
        );
    }
}
