use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Library crates whose events are shown, besides the binary itself.
const CRATE_TARGETS: &[&str] = &["hmdf", "hmdf_calendar", "hmdf_io", "hmdf_proj", "hmdf_series"];

/// Level for a `-v` count: warn, then info, debug and trace.
fn level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn directives(verbosity: u8) -> String {
    let level = level(verbosity).as_str().to_ascii_lowercase();
    CRATE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the stderr subscriber. `RUST_LOG`, when set, wins over `-v`.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
