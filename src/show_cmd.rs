//! Show command: print a dataset summary and per-station reports.

use anyhow::{Result, bail};
use hmdf_io::Dataset;
use hmdf_proj::epsg_description;
use hmdf_series::Station;
use tracing::info_span;

use crate::cli::ShowArgs;
use crate::convert;

pub fn run(args: ShowArgs) -> Result<()> {
    let _cmd = info_span!("show").entered();
    let dataset = convert::read_dataset(&args.read)?;

    print_summary(&dataset);
    match args.station {
        Some(index) => {
            let Some(station) = dataset.station(index) else {
                bail!(
                    "station {index} out of range, file has {} stations",
                    dataset.n_stations()
                );
            };
            print_station(station);
        }
        None => dataset.iter().for_each(print_station),
    }
    Ok(())
}

fn print_summary(dataset: &Dataset) {
    if let Some(format) = dataset.format() {
        println!("Format: {format}");
    }
    for line in dataset.header() {
        println!("Header: {line}");
    }
    let projection = epsg_description(dataset.epsg()).unwrap_or_else(|| "unknown".to_string());
    println!("Projection: EPSG:{} ({projection})", dataset.epsg());
    println!("Stations: {}", dataset.n_stations());
    if let Some(catalog) = dataset.nefis_catalog() {
        println!(
            "Series: {} ({} layers, {})",
            catalog.len(),
            catalog.layers(),
            catalog.layer_model()
        );
        for series in catalog.series() {
            println!("  {:<12} {:<8} {}", series.name, series.units, series.description);
        }
    }
    println!();
}

fn print_station(station: &Station) {
    println!("{station}");
}
