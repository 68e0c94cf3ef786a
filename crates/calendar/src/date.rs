//! Absolute instant with millisecond resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::components::DateComponents;
use crate::error::CalendarError;

/// Format used by [`Display`](fmt::Display) and [`Date::to_string`].
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An absolute instant stored as signed milliseconds since the Unix epoch.
///
/// Components are interpreted in the proleptic Gregorian calendar with no
/// time zone. Ordering and equality are a total order over the millisecond
/// count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    millis: i64,
}

impl Date {
    /// 1970-01-01 00:00:00.
    pub const EPOCH: Date = Date { millis: 0 };

    /// 1900-01-01 00:00:00, the lower "not yet set" sentinel.
    pub const MIN_SENTINEL: Date = Date {
        millis: -2_208_988_800_000,
    };

    /// 3000-01-01 00:00:00, the upper "not yet set" sentinel.
    pub const MAX_SENTINEL: Date = Date {
        millis: 32_503_680_000_000,
    };

    /// Creates a date from calendar components.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] if the year/month/day triple is
    /// not a real day, or [`CalendarError::InvalidTime`] if a time-of-day
    /// component is out of range.
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self, CalendarError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(CalendarError::InvalidDate { year, month, day })?;
        let invalid_time = CalendarError::InvalidTime {
            hour,
            minute,
            second,
            millisecond,
        };
        // chrono encodes leap seconds as milliseconds >= 1000.
        if millisecond >= 1000 {
            return Err(invalid_time);
        }
        let datetime = date
            .and_hms_milli_opt(hour, minute, second, millisecond)
            .ok_or(invalid_time)?;
        Ok(Self::from_naive(datetime))
    }

    /// Creates a date at midnight of the given day.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] if the day does not exist.
    pub fn ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    /// Creates a date from a [`DateComponents`] tuple.
    ///
    /// # Errors
    ///
    /// Same as [`Date::new`].
    pub fn from_components(c: DateComponents) -> Result<Self, CalendarError> {
        Self::new(
            c.year,
            c.month,
            c.day,
            c.hour,
            c.minute,
            c.second,
            c.millisecond,
        )
    }

    /// Creates a date from milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the instant cannot be
    /// expressed as calendar components.
    pub fn from_millis(millis: i64) -> Result<Self, CalendarError> {
        if DateTime::<Utc>::from_timestamp_millis(millis).is_none() {
            return Err(CalendarError::out_of_range(format!(
                "converting {millis} ms"
            )));
        }
        Ok(Self { millis })
    }

    /// Creates a date from whole seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the instant cannot be
    /// expressed as calendar components.
    pub fn from_seconds(seconds: i64) -> Result<Self, CalendarError> {
        let millis = seconds
            .checked_mul(1000)
            .ok_or_else(|| CalendarError::out_of_range(format!("converting {seconds} s")))?;
        Self::from_millis(millis)
    }

    /// The current wall-clock time, truncated to milliseconds.
    pub fn now() -> Self {
        Self {
            millis: Utc::now().timestamp_millis(),
        }
    }

    /// Milliseconds since the Unix epoch.
    pub fn millis(self) -> i64 {
        self.millis
    }

    /// Whole seconds since the Unix epoch, rounded toward negative infinity.
    pub fn seconds(self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// Splits the instant into calendar components.
    pub fn components(self) -> DateComponents {
        let dt = self.to_naive();
        DateComponents {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            millisecond: self.millisecond(),
        }
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.to_naive().year()
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u32 {
        self.to_naive().month()
    }

    /// Returns the day of the month (1..=31).
    pub fn day(self) -> u32 {
        self.to_naive().day()
    }

    /// Returns the hour (0..=23).
    pub fn hour(self) -> u32 {
        self.to_naive().hour()
    }

    /// Returns the minute (0..=59).
    pub fn minute(self) -> u32 {
        self.to_naive().minute()
    }

    /// Returns the second (0..=59).
    pub fn second(self) -> u32 {
        self.to_naive().second()
    }

    /// Returns the millisecond within the second (0..=999).
    pub fn millisecond(self) -> u32 {
        self.millis.rem_euclid(1000) as u32
    }

    /// Returns a copy with the components replaced by `f`'s edits.
    ///
    /// # Errors
    ///
    /// Same as [`Date::new`] for the edited components.
    pub fn with_components(
        self,
        f: impl FnOnce(&mut DateComponents),
    ) -> Result<Self, CalendarError> {
        let mut c = self.components();
        f(&mut c);
        Self::from_components(c)
    }

    /// Formats the date with a strftime-style pattern.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidFormat`] if the pattern contains an
    /// unsupported specifier.
    pub fn format(self, pattern: &str) -> Result<String, CalendarError> {
        use std::fmt::Write;

        let mut out = String::new();
        write!(out, "{}", self.to_naive().format(pattern)).map_err(|_| {
            CalendarError::InvalidFormat {
                pattern: pattern.to_string(),
            }
        })?;
        Ok(out)
    }

    /// Parses a date with a strftime-style pattern.
    ///
    /// Patterns without time fields are accepted and yield midnight.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Parse`] if `input` does not match `pattern`.
    pub fn parse(input: &str, pattern: &str) -> Result<Self, CalendarError> {
        let input = input.trim();
        match NaiveDateTime::parse_from_str(input, pattern) {
            Ok(dt) => Ok(Self::from_naive(dt)),
            Err(full_err) => NaiveDate::parse_from_str(input, pattern)
                .map(|d| Self::from_naive(d.and_time(chrono::NaiveTime::MIN)))
                .map_err(|_| CalendarError::Parse {
                    input: input.to_string(),
                    reason: full_err.to_string(),
                }),
        }
    }

    pub(crate) fn from_naive(dt: NaiveDateTime) -> Self {
        Self {
            millis: dt.and_utc().timestamp_millis(),
        }
    }

    pub(crate) fn to_naive(self) -> NaiveDateTime {
        // Every constructor checks that the instant is representable.
        DateTime::<Utc>::from_timestamp_millis(self.millis)
            .expect("Date always holds a representable instant")
            .naive_utc()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.to_naive();
        write!(f, "{}", dt.format(DEFAULT_FORMAT))?;
        let ms = self.millisecond();
        if ms != 0 {
            write!(f, ".{ms:03}")?;
        }
        Ok(())
    }
}

impl FromStr for Date {
    type Err = CalendarError;

    /// Accepts `YYYY-MM-DD HH:MM:SS[.fff]`, the same with a `T` separator,
    /// or a bare `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const PATTERNS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d"];
        let mut last_err = None;
        for pattern in PATTERNS {
            match Self::parse(s, pattern) {
                Ok(d) => return Ok(d),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| CalendarError::Parse {
            input: s.to_string(),
            reason: "no pattern matched".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_valid() {
        let d = Date::new(2019, 2, 5, 6, 30, 15, 250).unwrap();
        assert_eq!(d.year(), 2019);
        assert_eq!(d.month(), 2);
        assert_eq!(d.day(), 5);
        assert_eq!(d.hour(), 6);
        assert_eq!(d.minute(), 30);
        assert_eq!(d.second(), 15);
        assert_eq!(d.millisecond(), 250);
    }

    #[test]
    fn new_invalid_day() {
        assert_eq!(
            Date::ymd(2019, 2, 29).unwrap_err(),
            CalendarError::InvalidDate {
                year: 2019,
                month: 2,
                day: 29,
            }
        );
    }

    #[test]
    fn new_leap_day() {
        let d = Date::ymd(2020, 2, 29).unwrap();
        assert_eq!(d.month(), 2);
        assert_eq!(d.day(), 29);
    }

    #[test]
    fn new_invalid_hour() {
        assert!(matches!(
            Date::new(2019, 1, 1, 24, 0, 0, 0).unwrap_err(),
            CalendarError::InvalidTime { hour: 24, .. }
        ));
    }

    #[test]
    fn epoch_is_zero() {
        assert_eq!(Date::ymd(1970, 1, 1).unwrap(), Date::EPOCH);
        assert_eq!(Date::default(), Date::EPOCH);
    }

    #[test]
    fn sentinels_match_components() {
        assert_eq!(Date::ymd(1900, 1, 1).unwrap(), Date::MIN_SENTINEL);
        assert_eq!(Date::ymd(3000, 1, 1).unwrap(), Date::MAX_SENTINEL);
        assert!(Date::MIN_SENTINEL < Date::MAX_SENTINEL);
    }

    #[test]
    fn negative_millis_before_epoch() {
        let d = Date::new(1969, 12, 31, 23, 59, 59, 500).unwrap();
        assert_eq!(d.millis(), -500);
        assert_eq!(d.seconds(), -1);
        assert_eq!(d.millisecond(), 500);
    }

    #[test]
    fn from_seconds_matches_new() {
        let d = Date::from_seconds(1_549_324_800).unwrap();
        assert_eq!(d, Date::ymd(2019, 2, 5).unwrap());
    }

    #[test]
    fn from_millis_out_of_range() {
        assert!(matches!(
            Date::from_millis(i64::MAX).unwrap_err(),
            CalendarError::OutOfRange { .. }
        ));
    }

    #[test]
    fn ordering_is_by_instant() {
        let a = Date::new(2019, 1, 1, 0, 0, 0, 1).unwrap();
        let b = Date::new(2019, 1, 1, 0, 0, 0, 2).unwrap();
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn with_components_edits() {
        let d = Date::ymd(2019, 6, 15).unwrap();
        let e = d.with_components(|c| c.hour = 12).unwrap();
        assert_eq!(e.hour(), 12);
        assert_eq!(e.day(), 15);
        assert!(d.with_components(|c| c.day = 31).is_err());
    }

    #[test]
    fn display_default_format() {
        let d = Date::new(2019, 2, 5, 1, 2, 3, 0).unwrap();
        assert_eq!(d.to_string(), "2019-02-05 01:02:03");
        let d = Date::new(2019, 2, 5, 1, 2, 3, 45).unwrap();
        assert_eq!(d.to_string(), "2019-02-05 01:02:03.045");
    }

    #[test]
    fn format_custom_pattern() {
        let d = Date::new(2019, 2, 5, 1, 2, 3, 0).unwrap();
        assert_eq!(d.format("%Y%m%d").unwrap(), "20190205");
    }

    #[test]
    fn format_invalid_pattern() {
        let d = Date::EPOCH;
        assert!(matches!(
            d.format("%Q").unwrap_err(),
            CalendarError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn parse_with_pattern() {
        let d = Date::parse("05/02/2019 12:00", "%d/%m/%Y %H:%M").unwrap();
        assert_eq!(d, Date::new(2019, 2, 5, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_date_only_pattern() {
        let d = Date::parse("2019-02-05", "%Y-%m-%d").unwrap();
        assert_eq!(d, Date::ymd(2019, 2, 5).unwrap());
    }

    #[test]
    fn from_str_variants() {
        let expected = Date::new(2019, 2, 5, 6, 0, 0, 0).unwrap();
        assert_eq!("2019-02-05 06:00:00".parse::<Date>().unwrap(), expected);
        assert_eq!("2019-02-05T06:00:00".parse::<Date>().unwrap(), expected);
        assert_eq!(
            "2019-02-05".parse::<Date>().unwrap(),
            Date::ymd(2019, 2, 5).unwrap()
        );
        assert!("not a date".parse::<Date>().is_err());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        let d = Date::new(2021, 11, 30, 23, 59, 58, 7).unwrap();
        assert_eq!(d.to_string().parse::<Date>().unwrap(), d);
    }
}
