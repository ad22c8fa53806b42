//! Calendar dates without a time-of-day component.
//!
//! Dates are stored and exchanged in the zero-padded ISO form `YYYY-MM-DD`,
//! which sorts the same way as text and as a date. All values are kept inside
//! `0000-01-01..=9999-12-31` so that equivalence holds everywhere.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use time::macros::{date, format_description};
use time::{Date, Duration, OffsetDateTime};

use crate::error::DateError;

/// Largest day shift accepted by [`DateOnly::add_days`] before saturating.
const MAX_SHIFT_DAYS: i64 = 4_000_000;

/// A calendar day.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct DateOnly(Date);

impl DateOnly {
    /// Earliest representable day.
    pub const EARLIEST: Self = Self(date!(0000 - 01 - 01));

    /// Sentinel used for records that lost their due date; sinks to the end of Future.
    pub const FAR_FUTURE: Self = Self(date!(9999 - 12 - 31));

    /// Current day on the local wall clock.
    ///
    /// Falls back to UTC when the local offset cannot be determined, which
    /// happens on some platforms once other threads are running.
    #[must_use]
    pub fn today() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self(now.date()).clamped()
    }

    /// Shift by exactly `days` whole days.
    ///
    /// Pure calendar arithmetic: no time-of-day or offset is involved, so
    /// daylight-saving transitions can never move the result.
    #[must_use]
    pub fn add_days(self, days: i64) -> Self {
        let days = days.clamp(-MAX_SHIFT_DAYS, MAX_SHIFT_DAYS);
        Self(self.0.saturating_add(Duration::days(days))).clamped()
    }

    /// Underlying [`time::Date`].
    #[must_use]
    pub const fn as_date(self) -> Date {
        self.0
    }

    fn clamped(self) -> Self {
        if self < Self::EARLIEST {
            Self::EARLIEST
        } else if self > Self::FAR_FUTURE {
            Self::FAR_FUTURE
        } else {
            self
        }
    }
}

impl From<Date> for DateOnly {
    fn from(value: Date) -> Self {
        Self(value).clamped()
    }
}

impl fmt::Display for DateOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .0
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for DateOnly {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !has_iso_shape(s) {
            return Err(DateError::InvalidDate(s.to_owned()));
        }
        Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| DateError::InvalidDate(s.to_owned()))
    }
}

/// Exactly four digits, dash, two digits, dash, two digits.
fn has_iso_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, b)| match idx {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl Serialize for DateOnly {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateOnly {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> DateOnly {
        s.parse().unwrap_or_else(|err| panic!("must parse {s}: {err}"))
    }

    #[test]
    fn parse_and_format_roundtrip() {
        for text in ["2024-01-01", "0001-12-31", "2024-02-29", "9999-12-31"] {
            assert_eq!(day(text).to_string(), text);
        }
    }

    #[test]
    fn display_zero_pads_every_component() {
        assert_eq!(DateOnly::EARLIEST.to_string(), "0000-01-01");
        assert_eq!(DateOnly::from(date!(0042 - 03 - 04)).to_string(), "0042-03-04");
        assert_eq!(format!("{}", DateOnly::FAR_FUTURE), "9999-12-31");
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "2024-1-01",
            "24-01-01",
            "2024/01/01",
            "2024-01-01T00:00",
            "+2024-01-1",
            "2023-02-29",
            "2024-13-01",
            "",
        ] {
            assert_eq!(
                bad.parse::<DateOnly>(),
                Err(DateError::InvalidDate(bad.to_owned())),
                "{bad} must be rejected"
            );
        }
    }

    #[test]
    fn add_days_crosses_month_and_year_boundaries() {
        assert_eq!(day("2024-01-31").add_days(1), day("2024-02-01"));
        assert_eq!(day("2024-12-31").add_days(1), day("2025-01-01"));
        assert_eq!(day("2024-03-01").add_days(-1), day("2024-02-29"));
        assert_eq!(day("2024-06-01").add_days(365), day("2025-06-01"));
    }

    #[test]
    fn add_days_ignores_daylight_saving_changes() {
        // 2024-03-10 and 2024-11-03 are DST switch days in North America,
        // 2024-03-31 and 2024-10-27 in Europe.
        assert_eq!(day("2024-03-09").add_days(1), day("2024-03-10"));
        assert_eq!(day("2024-03-10").add_days(1), day("2024-03-11"));
        assert_eq!(day("2024-03-30").add_days(2), day("2024-04-01"));
        assert_eq!(day("2024-10-26").add_days(1), day("2024-10-27"));
        assert_eq!(day("2024-11-03").add_days(-1), day("2024-11-02"));
    }

    #[test]
    fn add_days_saturates_at_representable_range() {
        assert_eq!(day("9999-12-30").add_days(10), DateOnly::FAR_FUTURE);
        assert_eq!(day("0000-01-02").add_days(-10), DateOnly::EARLIEST);
        assert_eq!(day("2024-01-01").add_days(i64::MAX), DateOnly::FAR_FUTURE);
    }

    #[test]
    fn ordering_matches_text_ordering() {
        let mut dates = vec![day("2024-10-01"), day("2024-09-30"), day("2023-12-31")];
        dates.sort();
        let text: Vec<String> = dates.iter().map(ToString::to_string).collect();
        let mut sorted_text = text.clone();
        sorted_text.sort();
        assert_eq!(text, sorted_text);
    }

    #[test]
    fn serde_uses_iso_text() {
        let json = serde_json::to_string(&day("2024-06-01"))
            .unwrap_or_else(|err| panic!("must serialize: {err}"));
        assert_eq!(json, "\"2024-06-01\"");
        let back: DateOnly =
            serde_json::from_str(&json).unwrap_or_else(|err| panic!("must deserialize: {err}"));
        assert_eq!(back, day("2024-06-01"));
        assert!(serde_json::from_str::<DateOnly>("\"06/01/2024\"").is_err());
    }
}
