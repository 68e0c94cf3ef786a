//! Bounds command: print the aggregate time and value extent.

use anyhow::Result;
use tracing::{info, info_span};

use crate::cli::BoundsArgs;
use crate::convert;

pub fn run(args: BoundsArgs) -> Result<()> {
    let _cmd = info_span!("bounds").entered();
    let dataset = convert::read_dataset(&args.read)?;

    let Some(bounds) = dataset.bounds() else {
        info!(stations = dataset.n_stations(), "no samples to bound");
        println!("no samples");
        return Ok(());
    };

    let value = |v: Option<f64>| v.map_or_else(|| "none".to_string(), |v| format!("{v:.6}"));
    println!("Begin: {}", bounds.begin);
    println!("  End: {}", bounds.end);
    println!("  Min: {}", value(bounds.min));
    println!("  Max: {}", value(bounds.max));
    Ok(())
}
