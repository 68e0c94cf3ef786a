//! # hmdf-proj
//!
//! Coordinate transforms between EPSG-coded reference systems.
//!
//! Series containers depend only on the [`CoordinateTransform`] trait, so a
//! binding to a full geodesy library can be substituted for the built-in
//! [`EpsgTransformer`], which covers geographic WGS84/NAD83, the UTM zones on
//! both datums, and Web Mercator.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hmdf_proj::{CoordinateTransform, EpsgTransformer};
//!
//! let t = EpsgTransformer::new();
//! let (x, y) = t.transform(4326, 26915, -90.0, 29.0).unwrap();
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `transform` | The `CoordinateTransform` trait and batch checks |
//! | `crs` | EPSG code resolution, ellipsoids and descriptions |
//! | `builtin` | `EpsgTransformer` |
//! | `error` | Error types |

mod builtin;
mod crs;
mod error;
mod transform;

pub use builtin::EpsgTransformer;
pub use crs::{Crs, Datum, Ellipsoid, epsg_description};
pub use error::ProjError;
pub use transform::{CoordinateTransform, check_batch};

/// EPSG code of geographic WGS84 longitude/latitude.
pub const WGS84: i32 = 4326;
