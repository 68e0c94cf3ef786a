//! Merging CLI flags over the TOML config into a configured `Dataset`.

use anyhow::{Context, Result};
use hmdf_calendar::Date;
use hmdf_io::Dataset;

use crate::cli::ReadArgs;
use crate::config::{HmdfConfig, ReadToml};

/// Parses a cold start given either as `YYYY-MM-DD HH:MM:SS` or as a
/// compact digit string such as `20200801000000`.
pub fn parse_coldstart(s: &str) -> Result<Date> {
    s.parse::<Date>()
        .or_else(|_| Date::from_compact(s))
        .with_context(|| format!("invalid cold start time: {s:?}"))
}

/// Builds a [`Dataset`] for `args.file`. Flags win over config values.
pub fn build_dataset(args: &ReadArgs) -> Result<Dataset> {
    let config = match &args.config {
        Some(path) => HmdfConfig::load(path)?,
        None => HmdfConfig::default(),
    };
    let ReadToml {
        coldstart,
        station_file,
        epsg,
        sanitize,
    } = config.read;

    let mut dataset = Dataset::new(&args.file).with_sanitize(args.sanitize || sanitize);
    if let Some(s) = args.coldstart.as_deref().or(coldstart.as_deref()) {
        dataset = dataset.with_coldstart(parse_coldstart(s)?);
    }
    if let Some(path) = args.station_file.clone().or(station_file) {
        dataset = dataset.with_station_file(path);
    }
    if let Some(code) = args.epsg.or(epsg) {
        dataset = dataset.with_epsg(code);
    }
    Ok(dataset)
}

/// Builds and reads the dataset named by `args`.
pub fn read_dataset(args: &ReadArgs) -> Result<Dataset> {
    let mut dataset = build_dataset(args)?;
    dataset
        .read()
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn args(file: &str) -> ReadArgs {
        ReadArgs {
            file: PathBuf::from(file),
            config: None,
            coldstart: None,
            station_file: None,
            epsg: None,
            sanitize: false,
        }
    }

    #[test]
    fn coldstart_formats() {
        let expected = Date::new(2020, 8, 1, 6, 0, 0, 0).unwrap();
        assert_eq!(parse_coldstart("2020-08-01 06:00:00").unwrap(), expected);
        assert_eq!(parse_coldstart("20200801060000").unwrap(), expected);
        assert!(parse_coldstart("tomorrow").is_err());
    }

    #[test]
    fn flags_configure_dataset() {
        let mut a = args("fort.61");
        a.coldstart = Some("2020-08-01 00:00:00".to_string());
        a.station_file = Some(PathBuf::from("stations.txt"));
        let dataset = build_dataset(&a).unwrap();
        assert_eq!(dataset.coldstart(), Date::ymd(2020, 8, 1).unwrap());
        assert_eq!(
            dataset.station_file(),
            Some(PathBuf::from("stations.txt").as_path())
        );
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hmdf.toml");
        std::fs::write(
            &path,
            "[read]\ncoldstart = \"20190101\"\nstation_file = \"from_config.txt\"\n",
        )
        .unwrap();

        let mut a = args("fort.61");
        a.config = Some(path);
        a.station_file = Some(PathBuf::from("from_flag.txt"));
        let dataset = build_dataset(&a).unwrap();
        assert_eq!(dataset.coldstart(), Date::ymd(2019, 1, 1).unwrap());
        assert_eq!(
            dataset.station_file(),
            Some(PathBuf::from("from_flag.txt").as_path())
        );
    }
}
