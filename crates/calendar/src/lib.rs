//! # hmdf-calendar
//!
//! Millisecond-resolution instants on the proleptic Gregorian calendar.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(y, m, d, h, mi, s, ms)"] -->|"Date::new()"| B["Date (ms since epoch)"]
//!     B -->|".components()"| A
//!     B -->|".add_seconds() / .add_months()"| B
//!     C["text"] -->|"parse() / from_compact()"| B
//!     B -->|"format()"| C
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use hmdf_calendar::Date;
//!
//! let cold = Date::ymd(2019, 1, 31).unwrap();
//! let next = cold.add_months(1).unwrap(); // 2019-03-03, no clamping
//! let stamp = cold.add_fractional_seconds(1800.0).unwrap();
//! assert_eq!(stamp.to_string(), "2019-01-31 00:30:00");
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `date` | The `Date` instant, components, formatting and parsing |
//! | `components` | Plain calendar component tuple |
//! | `arithmetic` | Fixed-unit and calendar-unit addition |
//! | `compact` | `YYYYMMDDHHmmss` and packed integer forms |
//! | `error` | Error types |

mod arithmetic;
mod compact;
mod components;
mod date;
mod error;

pub use components::DateComponents;
pub use date::{DEFAULT_FORMAT, Date};
pub use error::CalendarError;
