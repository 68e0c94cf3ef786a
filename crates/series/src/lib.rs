//! # hmdf-series
//!
//! The in-memory model every reader fills: timestamped [`Sample`]s grouped
//! into per-site [`Station`] containers.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Date + 1..3 values"] -->|"Sample::new()"| B["Sample"]
//!     B -->|"Station::push()"| C["Station"]
//!     C -->|".sanitize()"| C
//!     C -->|".reproject(epsg, &transform)"| C
//!     C -->|".mean() / .median() / .minmax()"| D["statistics"]
//! ```
//!
//! Missing values are stored as [`NULL_VALUE`]; readers pass raw numbers
//! through [`null_if_missing`] so that source flags at or below −9999 are
//! normalised.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `sample` | `Sample`, null sentinel handling |
//! | `station` | `Station` container, metadata, sanitize, reproject, summary |
//! | `stats` | Per-component statistics on `Station` |
//! | `error` | Error types |

mod error;
mod sample;
mod station;
mod stats;

pub use error::SeriesError;
pub use sample::{MISSING_THRESHOLD, NULL_VALUE, Sample, null_if_missing};
pub use station::{DEFAULT_NAME, Location, NONE_TOKEN, Station};
