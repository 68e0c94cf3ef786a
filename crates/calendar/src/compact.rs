//! Compact numeric date forms found in model headers.

use crate::date::Date;
use crate::error::CalendarError;

impl Date {
    /// Parses a compact `YYYYMMDD[HH[mm[ss]]]` stamp.
    ///
    /// Separator characters are ignored, so `2019-02-05 06:00` and
    /// `201902050600` are equivalent. Missing time fields are zero.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Parse`] if the digit count is not 8, 10, 12
    /// or 14, and the usual component errors if the fields are out of range.
    pub fn from_compact(input: &str) -> Result<Self, CalendarError> {
        let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
        if !matches!(digits.len(), 8 | 10 | 12 | 14) {
            return Err(CalendarError::Parse {
                input: input.to_string(),
                reason: format!("expected 8, 10, 12 or 14 digits, found {}", digits.len()),
            });
        }

        let field = |start: usize, len: usize| -> u32 {
            digits
                .get(start..start + len)
                .map_or(0, |ds| ds.iter().fold(0, |acc, d| acc * 10 + d))
        };

        let year = field(0, 4) as i32;
        Self::new(year, field(4, 2), field(6, 2), field(8, 2), field(10, 2), field(12, 2), 0)
    }

    /// Creates a date at midnight from an integer packed as `YYYYMMDD`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDate`] if the packed fields do not name
    /// a real day.
    pub fn from_packed_ymd(packed: i64) -> Result<Self, CalendarError> {
        let year = packed.div_euclid(10_000);
        let month = packed.div_euclid(100).rem_euclid(100) as u32;
        let day = packed.rem_euclid(100) as u32;
        let year = i32::try_from(year).map_err(|_| CalendarError::InvalidDate {
            year: i32::MAX,
            month,
            day,
        })?;
        Self::ymd(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_full_stamp() {
        let d = Date::from_compact("20190205063015").unwrap();
        assert_eq!(d, Date::new(2019, 2, 5, 6, 30, 15, 0).unwrap());
    }

    #[test]
    fn compact_ignores_separators() {
        let d = Date::from_compact("2019-02-05 06:30").unwrap();
        assert_eq!(d, Date::new(2019, 2, 5, 6, 30, 0, 0).unwrap());
    }

    #[test]
    fn compact_date_only() {
        assert_eq!(
            Date::from_compact("20190205").unwrap(),
            Date::ymd(2019, 2, 5).unwrap()
        );
    }

    #[test]
    fn compact_wrong_length() {
        assert!(matches!(
            Date::from_compact("2019025").unwrap_err(),
            CalendarError::Parse { .. }
        ));
    }

    #[test]
    fn compact_invalid_month() {
        assert!(matches!(
            Date::from_compact("20191305").unwrap_err(),
            CalendarError::InvalidDate { month: 13, .. }
        ));
    }

    #[test]
    fn packed_ymd() {
        assert_eq!(
            Date::from_packed_ymd(20_190_205).unwrap(),
            Date::ymd(2019, 2, 5).unwrap()
        );
        assert!(Date::from_packed_ymd(20_190_230).is_err());
    }
}
