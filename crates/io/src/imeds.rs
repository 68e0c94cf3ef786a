//! IMEDS observation text.
//!
//! Three header lines, then one block per station: a `name lat lon` line
//! followed by observation lines `year month day hour minute [second] value`.
//! The first line that is not an observation starts the next block.

use std::path::Path;

use hmdf_calendar::Date;
use hmdf_proj::WGS84;
use hmdf_series::{Sample, Station, null_if_missing};
use tracing::{info, warn};

use crate::error::IoError;
use crate::ingest::Ingest;
use crate::text::{LineReader, fields};

const HEADER_LINES: usize = 3;

/// One parsed observation line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Observation {
    fields: [u32; 5],
    year: i32,
    value: f64,
}

pub(crate) fn read(path: &Path) -> Result<Ingest, IoError> {
    let mut reader = LineReader::open(path)?;

    let mut header = Vec::with_capacity(HEADER_LINES);
    for _ in 0..HEADER_LINES {
        header.push(reader.expect_line("header line")?);
    }

    let malformed = |line: usize, reason: String| IoError::MalformedLine {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut stations: Vec<Station> = Vec::new();
    let mut current: Option<Station> = None;
    while let Some(raw) = reader.next_line()? {
        let line = reader.line_number();
        let text = clean(&raw);
        if text.is_empty() {
            continue;
        }

        if let Some(station) = current.as_mut()
            && let Some(obs) = observation(&text)
        {
            let [month, day, hour, minute, second] = obs.fields;
            let date = Date::new(obs.year, month, day, hour, minute, second, 0)
                .map_err(|e| malformed(line, e.to_string()))?;
            station.push(Sample::scalar(date, null_if_missing(obs.value)))?;
            continue;
        }

        let Some((name, lat, lon)) = station_header(&text) else {
            while let Some(rest) = reader.next_line()? {
                if !clean(&rest).is_empty() {
                    return Err(malformed(
                        line,
                        format!("expected station header 'name lat lon', got '{text}'"),
                    ));
                }
            }
            warn!(path = %path.display(), line, "ignoring trailing line that is not a station header");
            break;
        };

        stations.extend(current.take());
        let mut station = Station::at(stations.len(), lon, lat, WGS84);
        station.set_name(name);
        current = Some(station);
    }
    stations.extend(current);

    let ingest = Ingest {
        stations,
        header,
        epsg: None,
    };
    info!(
        path = %path.display(),
        stations = ingest.stations.len(),
        samples = ingest.sample_count(),
        "read IMEDS file"
    );
    Ok(ingest)
}

/// Trims the line, normalises tabs and drops carriage returns.
fn clean(line: &str) -> String {
    line.replace('\t', " ").replace('\r', "").trim().to_string()
}

fn station_header(line: &str) -> Option<(String, f64, f64)> {
    let f = fields(line);
    if f.len() != 3 {
        return None;
    }
    let lat = f[1].parse().ok()?;
    let lon = f[2].parse().ok()?;
    Some((f[0].to_string(), lat, lon))
}

/// Parses `y m d h mi s v`, falling back to `y m d h mi v` with zero
/// seconds.
fn observation(line: &str) -> Option<Observation> {
    let f = fields(line);
    let (ints, value) = match f.len() {
        7 => (&f[1..6], f[6]),
        6 => (&f[1..5], f[5]),
        _ => return None,
    };
    let year = f[0].parse().ok()?;
    let mut fields = [0u32; 5];
    for (slot, token) in fields.iter_mut().zip(ints) {
        *slot = token.parse().ok()?;
    }
    Some(Observation {
        fields,
        year,
        value: value.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_field_observation() {
        let obs = observation("2019 7 4 12 30 15 0.75").unwrap();
        assert_eq!(obs.year, 2019);
        assert_eq!(obs.fields, [7, 4, 12, 30, 15]);
        assert_eq!(obs.value, 0.75);
    }

    #[test]
    fn five_field_observation_has_zero_seconds() {
        let obs = observation("2019 7 4 12 30 -0.5").unwrap();
        assert_eq!(obs.fields, [7, 4, 12, 30, 0]);
        assert_eq!(obs.value, -0.5);
    }

    #[test]
    fn non_observations() {
        assert!(observation("8761724 29.26 -89.96").is_none());
        assert!(observation("2019 7 4 12 30 15 x").is_none());
        assert!(observation("2019 7.5 4 12 30 15 1.0").is_none());
        assert!(observation("").is_none());
    }

    #[test]
    fn header_is_name_lat_lon() {
        let (name, lat, lon) = station_header("8761724, 29.26, -89.96").unwrap();
        assert_eq!(name, "8761724");
        assert_eq!(lat, 29.26);
        assert_eq!(lon, -89.96);
        assert!(station_header("garbage").is_none());
    }

    #[test]
    fn truncated_observation_is_not_a_header() {
        assert!(station_header("2019 7 4 2 0").is_none());
        assert!(observation("2019 7 4 2 0").is_none());
    }

    #[test]
    fn clean_normalises_whitespace() {
        assert_eq!(clean("\tA\tB \r"), "A B");
    }
}
