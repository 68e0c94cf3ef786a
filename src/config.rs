use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level hmdf configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HmdfConfig {
    /// Reader settings.
    #[serde(default)]
    pub read: ReadToml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadToml {
    pub coldstart: Option<String>,
    pub station_file: Option<PathBuf>,
    pub epsg: Option<i32>,
    #[serde(default)]
    pub sanitize: bool,
}

impl HmdfConfig {
    /// Loads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}
