//! Error types for the hmdf-calendar crate.

/// Error type for all fallible operations in the hmdf-calendar crate.
///
/// This enum covers invalid calendar components, instants that fall outside
/// the representable range, and failures while parsing or formatting dates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a year/month/day triple does not name a real day.
    #[error("invalid date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Year that was provided.
        year: i32,
        /// Month that was provided.
        month: u32,
        /// Day that was provided.
        day: u32,
    },

    /// Returned when a time-of-day component is out of range.
    #[error("invalid time of day: {hour:02}:{minute:02}:{second:02}.{millisecond:03}")]
    InvalidTime {
        /// Hour that was provided.
        hour: u32,
        /// Minute that was provided.
        minute: u32,
        /// Second that was provided.
        second: u32,
        /// Millisecond that was provided.
        millisecond: u32,
    },

    /// Returned when an operation would leave the representable range.
    #[error("date out of range while {operation}")]
    OutOfRange {
        /// Short description of the operation that overflowed.
        operation: String,
    },

    /// Returned when a string cannot be parsed as a date.
    #[error("cannot parse '{input}' as a date: {reason}")]
    Parse {
        /// The input that failed to parse.
        input: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// Returned when a format pattern contains an invalid specifier.
    #[error("invalid date format pattern '{pattern}'")]
    InvalidFormat {
        /// The offending pattern.
        pattern: String,
    },
}

impl CalendarError {
    pub(crate) fn out_of_range(operation: impl Into<String>) -> Self {
        Self::OutOfRange {
            operation: operation.into(),
        }
    }
}
