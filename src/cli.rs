use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Read hydrodynamic model and observation station files.
#[derive(Parser)]
#[command(
    name = "hmdf",
    version,
    about = "Read hydrodynamic model and observation station files"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print station summaries.
    Show(ShowArgs),
    /// Print the time and value extent of a file.
    Bounds(BoundsArgs),
}

/// Options shared by every subcommand that reads a file.
#[derive(clap::Args)]
pub struct ReadArgs {
    /// Input file (.61/.62/.71/.72, .nc, .imeds, .dat/.def).
    pub file: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Cold start time for ADCIRC output ("YYYY-MM-DD HH:MM:SS" or
    /// YYYYMMDDHHmmss).
    #[arg(long)]
    pub coldstart: Option<String>,

    /// Station location file for ADCIRC text output.
    #[arg(long = "stations")]
    pub station_file: Option<PathBuf>,

    /// Reproject station locations to this EPSG code.
    #[arg(long)]
    pub epsg: Option<i32>,

    /// Sort and deduplicate samples after reading.
    #[arg(long)]
    pub sanitize: bool,
}

/// Arguments for the `show` subcommand.
#[derive(clap::Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub read: ReadArgs,

    /// Only show the station at this 0-based index.
    #[arg(short, long)]
    pub station: Option<usize>,
}

/// Arguments for the `bounds` subcommand.
#[derive(clap::Args)]
pub struct BoundsArgs {
    #[command(flatten)]
    pub read: ReadArgs,
}
