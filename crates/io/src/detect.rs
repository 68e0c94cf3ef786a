//! File format detection.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::IoError;
use crate::netcdf_read::open_file;

/// The on-disk layouts this crate can ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// ADCIRC fort.61/62/71/72 text output plus a station location file.
    AdcircAscii,
    /// ADCIRC station output in netCDF.
    AdcircNetcdf,
    /// Delft3D history output in a NEFIS `.def`/`.dat` pair.
    Nefis,
    /// IMEDS delimited observation text.
    Imeds,
    /// Multi-station netCDF with one time/data variable pair per station.
    GenericNetcdf,
}

impl FileFormat {
    /// Detects the format of `path`.
    ///
    /// Most formats are recognised by extension alone. A `.nc` file is
    /// opened: a `time_station_0001` variable marks the generic layout,
    /// otherwise a global `slam0` attribute marks ADCIRC output.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::UnknownFormat`] if nothing matches, or the netCDF
    /// error if a `.nc` file cannot be opened.
    pub fn detect(path: &Path) -> Result<Self, IoError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let format = match extension.as_str() {
            "61" | "62" | "71" | "72" => Some(Self::AdcircAscii),
            "imeds" => Some(Self::Imeds),
            "dat" | "def" => Some(Self::Nefis),
            "nc" => detect_netcdf(path)?,
            _ => None,
        }
        .ok_or_else(|| IoError::UnknownFormat {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), ?format, "detected file format");
        Ok(format)
    }

    /// Whether reading needs a separate station location file.
    pub fn needs_station_file(self) -> bool {
        self == Self::AdcircAscii
    }
}

fn detect_netcdf(path: &Path) -> Result<Option<FileFormat>, IoError> {
    let file = open_file(path)?;
    if file.variable("time_station_0001").is_some() {
        Ok(Some(FileFormat::GenericNetcdf))
    } else if file.attribute("slam0").is_some() {
        Ok(Some(FileFormat::AdcircNetcdf))
    } else {
        Ok(None)
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AdcircAscii => "ADCIRC ASCII",
            Self::AdcircNetcdf => "ADCIRC netCDF",
            Self::Nefis => "Delft3D NEFIS",
            Self::Imeds => "IMEDS",
            Self::GenericNetcdf => "generic netCDF",
        };
        f.write_str(name)
    }
}
