use crate::error::DurationError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::time::Duration;

pub const MIN_DURATION_MS: u64 = 15_000;
pub const MAX_DURATION_MS: u64 = 600_000;

lazy_static! {
    static ref DURATION_TOKEN: Regex =
        Regex::new(r"^(\d+)([sm])$").expect("duration pattern is valid");
}

/// A poll length that has passed validation. Only `parse` builds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollDuration {
    millis: u64,
}

impl PollDuration {
    /// Parses tokens like `30s` or `2m` into a duration between 15 seconds and 10 minutes.
    pub fn parse(token: &str) -> Result<Self, DurationError> {
        let captures = DURATION_TOKEN
            .captures(token)
            .ok_or_else(|| DurationError::InvalidFormat(token.to_string()))?;

        let unit_millis = match &captures[2] {
            "s" => 1_000,
            "m" => 60_000,
            _ => return Err(DurationError::InvalidFormat(token.to_string())),
        };

        // Too many digits for u64 is still a well-formed token, just far out of range.
        let amount = captures[1].parse::<u64>().unwrap_or(u64::MAX);
        let millis = amount.saturating_mul(unit_millis);

        if !(MIN_DURATION_MS..=MAX_DURATION_MS).contains(&millis) {
            return Err(DurationError::OutOfRange { millis });
        }

        Ok(Self { millis })
    }

    pub fn as_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_std(&self) -> Duration {
        Duration::from_millis(self.millis)
    }
}

impl fmt::Display for PollDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.millis / 1_000;
        match (seconds / 60, seconds % 60) {
            (0, secs) => write!(f, "{}s", secs),
            (mins, 0) => write!(f, "{}m", mins),
            (mins, secs) => write!(f, "{}m {}s", mins, secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_seconds_and_minutes() {
        assert_eq!(PollDuration::parse("30s").unwrap().as_millis(), 30_000);
        assert_eq!(PollDuration::parse("2m").unwrap().as_millis(), 120_000);
        assert_eq!(PollDuration::parse("90s").unwrap().as_millis(), 90_000);
        assert_eq!(PollDuration::parse("010m").unwrap().as_millis(), 600_000);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(PollDuration::parse("15s").is_ok());
        assert!(PollDuration::parse("600s").is_ok());
        assert!(PollDuration::parse("10m").is_ok());
        assert_eq!(
            PollDuration::parse("14s"),
            Err(DurationError::OutOfRange { millis: 14_000 })
        );
        assert_eq!(
            PollDuration::parse("601s"),
            Err(DurationError::OutOfRange { millis: 601_000 })
        );
        assert_eq!(
            PollDuration::parse("11m"),
            Err(DurationError::OutOfRange { millis: 660_000 })
        );
        assert_eq!(
            PollDuration::parse("0m"),
            Err(DurationError::OutOfRange { millis: 0 })
        );
    }

    #[test]
    fn every_valid_second_count_round_trips() {
        for secs in 15..=600u64 {
            let parsed = PollDuration::parse(&format!("{}s", secs)).unwrap();
            assert_eq!(parsed.as_millis(), secs * 1_000);
        }
        for mins in 1..=10u64 {
            let parsed = PollDuration::parse(&format!("{}m", mins)).unwrap();
            assert_eq!(parsed.as_millis(), mins * 60_000);
        }
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in [
            "abc", "5", "5h", "-5s", "", "s", "1.5m", " 30s", "30s ", "30S", "3 0s", "30sm",
        ] {
            assert_eq!(
                PollDuration::parse(token),
                Err(DurationError::InvalidFormat(token.to_string())),
                "token {:?}",
                token
            );
        }
    }

    #[test]
    fn huge_amounts_are_out_of_range_not_malformed() {
        assert!(matches!(
            PollDuration::parse("99999999999999999999999m"),
            Err(DurationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(PollDuration::parse("45s").unwrap().to_string(), "45s");
        assert_eq!(PollDuration::parse("120s").unwrap().to_string(), "2m");
        assert_eq!(PollDuration::parse("90s").unwrap().to_string(), "1m 30s");
    }
}
