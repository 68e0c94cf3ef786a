//! Broken-down calendar components.

/// A date split into calendar fields.
///
/// Produced by [`Date::components`](crate::Date::components) and consumed by
/// [`Date::from_components`](crate::Date::from_components).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateComponents {
    /// Proleptic Gregorian year.
    pub year: i32,
    /// Month (1..=12).
    pub month: u32,
    /// Day of the month (1..=31).
    pub day: u32,
    /// Hour (0..=23).
    pub hour: u32,
    /// Minute (0..=59).
    pub minute: u32,
    /// Second (0..=59).
    pub second: u32,
    /// Millisecond (0..=999).
    pub millisecond: u32,
}

impl DateComponents {
    /// Components for midnight of the given day. No validation is performed.
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    /// Returns the fields as a `(y, m, d, h, mi, s, ms)` tuple.
    pub fn as_tuple(&self) -> (i32, u32, u32, u32, u32, u32, u32) {
        (
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        )
    }
}
