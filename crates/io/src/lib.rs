//! # hmdf-io
//!
//! Detects the format of hydrodynamic station output and reads it into
//! [`Station`](hmdf_series::Station) containers held by a [`Dataset`].
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     P["path"] -->|"FileFormat::detect()"| F["FileFormat"]
//!     F --> A["ADCIRC ASCII + station file"]
//!     F --> N["ADCIRC netCDF"]
//!     F --> G["generic netCDF"]
//!     F --> I["IMEDS"]
//!     F --> D["NEFIS header"]
//!     A & N & G & I & D --> S["Dataset"]
//!     D -.->|"read_nefis_value()"| S
//! ```
//!
//! Each reader builds its full station list before the dataset sees it, so a
//! failed [`Dataset::read`] never leaves partial results behind.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hmdf_io::Dataset;
//!
//! let mut data = Dataset::new("observations.imeds").with_sanitize(true);
//! data.read()?;
//! if let Some(bounds) = data.bounds() {
//!     println!("{} .. {}", bounds.begin, bounds.end);
//! }
//! # Ok::<(), hmdf_io::IoError>(())
//! ```
//!
//! NEFIS files need a [`NefisLibrary`] implementation supplied through
//! [`Dataset::with_nefis_library`].
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `detect` | `FileFormat` and extension/content detection |
//! | `dataset` | `Dataset`, `Bounds`, station management |
//! | `adcirc_ascii` | ADCIRC fort.61-style text and station location files |
//! | `adcirc_netcdf` | ADCIRC station netCDF |
//! | `generic_netcdf` | One time/data variable pair per station |
//! | `imeds` | IMEDS observation text |
//! | `nefis` | NEFIS library interface |
//! | `nefis_read` | NEFIS header pass, catalog, value reads |
//! | `netcdf_read`, `text` | Shared extraction helpers |
//! | `error` | Error types |

mod adcirc_ascii;
mod adcirc_netcdf;
mod dataset;
mod detect;
mod error;
mod generic_netcdf;
mod imeds;
mod ingest;
mod nefis;
mod nefis_read;
mod netcdf_read;
mod text;

pub use dataset::{Bounds, Dataset};
pub use detect::FileFormat;
pub use error::IoError;
pub use nefis::{ElementInfo, IndexRange, NefisError, NefisFile, NefisLibrary};
pub use nefis_read::{NefisCatalog, SeriesMetadata};
