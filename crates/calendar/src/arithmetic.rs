//! Fixed-length and calendar-aware date arithmetic.
//!
//! Fixed units (milliseconds through weeks) are plain millisecond offsets.
//! Calendar units (months, years) rebuild the component tuple: the month
//! count carries into the year, the day of the month is kept as given, and
//! the absolute instant is re-derived. A day that does not exist in the
//! target month rolls forward into the next one (January 31 plus one month
//! is March 3 in a common year); there is no end-of-month clamping.
//!
//! Negative amounts subtract.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::date::Date;
use crate::error::CalendarError;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

impl Date {
    /// Adds whole milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_milliseconds(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, 1, "milliseconds")
    }

    /// Adds whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_seconds(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, MS_PER_SECOND, "seconds")
    }

    /// Adds whole minutes.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_minutes(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, MS_PER_MINUTE, "minutes")
    }

    /// Adds whole hours.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_hours(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, MS_PER_HOUR, "hours")
    }

    /// Adds whole 24-hour days.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_days(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, MS_PER_DAY, "days")
    }

    /// Adds whole weeks.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the result is not
    /// representable.
    pub fn add_weeks(self, n: i64) -> Result<Self, CalendarError> {
        self.add_fixed(n, MS_PER_WEEK, "weeks")
    }

    /// Adds a fractional number of seconds, rounded down to the millisecond.
    ///
    /// This is how model output expressed as floating-point second offsets is
    /// placed on the time axis.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if `seconds` is not finite or
    /// the result is not representable.
    pub fn add_fractional_seconds(self, seconds: f64) -> Result<Self, CalendarError> {
        let ms = (seconds * 1000.0).floor();
        if !ms.is_finite() || ms < i64::MIN as f64 || ms > i64::MAX as f64 {
            return Err(CalendarError::out_of_range(format!(
                "adding {seconds} seconds"
            )));
        }
        self.add_milliseconds(ms as i64)
    }

    /// Adds calendar months.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the resulting year is not
    /// representable.
    pub fn add_months(self, months: i64) -> Result<Self, CalendarError> {
        let overflow = || CalendarError::out_of_range(format!("adding {months} months"));

        let c = self.components();
        let total = (i64::from(c.year) * 12 + i64::from(c.month) - 1)
            .checked_add(months)
            .ok_or_else(overflow)?;
        let year = i32::try_from(total.div_euclid(12)).map_err(|_| overflow())?;
        let month = (total.rem_euclid(12) + 1) as u32;

        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_days(Days::new(u64::from(c.day - 1))))
            .ok_or_else(overflow)?;
        let time = NaiveTime::from_hms_milli_opt(c.hour, c.minute, c.second, c.millisecond)
            .ok_or_else(overflow)?;

        Ok(Self::from_naive(date.and_time(time)))
    }

    /// Adds calendar years; equivalent to adding twelve months per year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::OutOfRange`] if the resulting year is not
    /// representable.
    pub fn add_years(self, years: i64) -> Result<Self, CalendarError> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| CalendarError::out_of_range(format!("adding {years} years")))?;
        self.add_months(months)
    }

    /// Signed milliseconds from `earlier` to `self`.
    pub fn millis_since(self, earlier: Date) -> i64 {
        self.millis() - earlier.millis()
    }

    fn add_fixed(self, n: i64, unit_ms: i64, unit: &str) -> Result<Self, CalendarError> {
        let overflow = || CalendarError::out_of_range(format!("adding {n} {unit}"));
        let offset = n.checked_mul(unit_ms).ok_or_else(overflow)?;
        let millis = self.millis().checked_add(offset).ok_or_else(overflow)?;
        Self::from_millis(millis).map_err(|_| overflow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::ymd(y, m, day).unwrap()
    }

    #[test]
    fn add_seconds_basic() {
        let start = d(2019, 2, 5);
        let later = start.add_seconds(3600).unwrap();
        assert_eq!(later.hour(), 1);
        assert_eq!(later.millis_since(start), 3_600_000);
    }

    #[test]
    fn add_fixed_units() {
        let start = d(2019, 12, 31);
        assert_eq!(start.add_minutes(90).unwrap().minute(), 30);
        assert_eq!(start.add_hours(24).unwrap(), d(2020, 1, 1));
        assert_eq!(start.add_days(60).unwrap(), d(2020, 2, 29));
        assert_eq!(start.add_weeks(2).unwrap(), d(2020, 1, 14));
        assert_eq!(start.add_milliseconds(-1).unwrap().day(), 30);
    }

    #[test]
    fn fractional_seconds_floor_to_millisecond() {
        let start = d(2000, 1, 1);
        assert_eq!(
            start.add_fractional_seconds(1.0005).unwrap().millis_since(start),
            1000
        );
        assert_eq!(
            start.add_fractional_seconds(-0.0005).unwrap().millis_since(start),
            -1
        );
        assert_eq!(
            start.add_fractional_seconds(1800.25).unwrap().millis_since(start),
            1_800_250
        );
    }

    #[test]
    fn fractional_seconds_rejects_non_finite() {
        assert!(Date::EPOCH.add_fractional_seconds(f64::NAN).is_err());
        assert!(Date::EPOCH.add_fractional_seconds(f64::INFINITY).is_err());
    }

    #[test]
    fn add_months_within_year() {
        assert_eq!(d(2019, 3, 15).add_months(2).unwrap(), d(2019, 5, 15));
    }

    #[test]
    fn add_months_carries_into_year() {
        assert_eq!(d(2019, 11, 15).add_months(3).unwrap(), d(2020, 2, 15));
        assert_eq!(d(2019, 1, 15).add_months(-1).unwrap(), d(2018, 12, 15));
        assert_eq!(d(2019, 1, 15).add_months(-13).unwrap(), d(2017, 12, 15));
    }

    #[test]
    fn add_months_rolls_missing_day_forward() {
        assert_eq!(d(2019, 1, 31).add_months(1).unwrap(), d(2019, 3, 3));
        assert_eq!(d(2020, 1, 31).add_months(1).unwrap(), d(2020, 3, 2));
    }

    #[test]
    fn add_months_keeps_time_of_day() {
        let start = Date::new(2019, 6, 1, 13, 45, 10, 5).unwrap();
        let later = start.add_months(1).unwrap();
        assert_eq!(later, Date::new(2019, 7, 1, 13, 45, 10, 5).unwrap());
    }

    #[test]
    fn add_years_from_leap_day() {
        assert_eq!(d(2020, 2, 29).add_years(1).unwrap(), d(2021, 3, 1));
        assert_eq!(d(2020, 2, 29).add_years(4).unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn add_months_overflow() {
        assert!(matches!(
            Date::EPOCH.add_months(i64::MAX).unwrap_err(),
            CalendarError::OutOfRange { .. }
        ));
    }

    #[test]
    fn add_seconds_overflow() {
        assert!(Date::EPOCH.add_seconds(i64::MAX).is_err());
    }
}
