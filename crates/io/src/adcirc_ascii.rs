//! ADCIRC fort.61/62/71/72 station output.
//!
//! The data file carries no coordinates, so a separate station location
//! file supplies them: a count on the first line, then one `x, y` pair per
//! line. The data file has a title line, a metadata line
//! `nstep nsta dt interval dim`, then `nstep` blocks of one `time iteration`
//! line followed by `nsta` lines of `index v1 [v2 [v3]]`.

use std::path::Path;

use hmdf_calendar::Date;
use hmdf_proj::WGS84;
use hmdf_series::{Sample, Station, null_if_missing};
use tracing::{debug, info};

use crate::error::IoError;
use crate::ingest::Ingest;
use crate::text::{LineReader, fields};

/// Station coordinates from a location file.
pub(crate) fn read_station_file(path: &Path) -> Result<Vec<(f64, f64)>, IoError> {
    let mut reader = LineReader::open(path)?;
    let line = reader.expect_line("station count")?;
    let count: usize = reader.parse(fields(&line).first().copied(), "station count")?;

    let mut coords = Vec::with_capacity(count);
    for _ in 0..count {
        let line = reader.expect_line("station coordinates")?;
        let f = fields(&line);
        let x: f64 = reader.parse(f.first().copied(), "x coordinate")?;
        let y: f64 = reader.parse(f.get(1).copied(), "y coordinate")?;
        coords.push((x, y));
    }
    debug!(path = %path.display(), stations = count, "read station file");
    Ok(coords)
}

/// Reads an ADCIRC text file. Sample times are `coldstart` plus each
/// block's time offset in seconds.
pub(crate) fn read(path: &Path, station_file: &Path, coldstart: Date) -> Result<Ingest, IoError> {
    let coords = read_station_file(station_file)?;

    let mut reader = LineReader::open(path)?;
    let title = reader.expect_line("title line")?;

    let line = reader.expect_line("metadata line")?;
    let meta = fields(&line);
    let nstep: usize = reader.parse(meta.first().copied(), "step count")?;
    let nsta: usize = reader.parse(meta.get(1).copied(), "station count")?;
    let _dt: f64 = reader.parse(meta.get(2).copied(), "time step")?;
    let _interval: i64 = reader.parse(meta.get(3).copied(), "output interval")?;
    let dim: usize = reader.parse(meta.get(4).copied(), "value dimension")?;

    if nsta != coords.len() {
        return Err(IoError::StationCountMismatch {
            station_file: coords.len(),
            data_file: nsta,
        });
    }
    if !(1..=3).contains(&dim) {
        return Err(reader.malformed(format!("value dimension must be 1, 2 or 3, got {dim}")));
    }

    let mut stations: Vec<Station> = coords
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let mut station = Station::at(i, x, y, WGS84);
            station.reserve(nstep);
            station
        })
        .collect();

    let mut values = [0.0; 3];
    for _ in 0..nstep {
        let line = reader.expect_line("time line")?;
        let offset: f64 = reader.parse(fields(&line).first().copied(), "time offset")?;
        let date = coldstart.add_fractional_seconds(offset)?;

        for (j, station) in stations.iter_mut().enumerate() {
            let line = reader.expect_line("station record")?;
            let f = fields(&line);
            let index: usize = reader.parse(f.first().copied(), "station index")?;
            if index != j + 1 {
                return Err(reader.malformed(format!(
                    "expected record for station {}, got {index}",
                    j + 1
                )));
            }
            for (c, value) in values.iter_mut().take(dim).enumerate() {
                let v: f64 = reader.parse(f.get(c + 1).copied(), "value")?;
                *value = null_if_missing(v);
            }
            station.push(Sample::new(date, &values[..dim])?)?;
        }
    }

    let ingest = Ingest {
        stations,
        header: vec![title],
        epsg: None,
    };
    info!(
        path = %path.display(),
        stations = ingest.stations.len(),
        samples = ingest.sample_count(),
        "read ADCIRC ASCII file"
    );
    Ok(ingest)
}
