//! Subcommand implementations.

pub mod analyze;
pub mod config;

use std::path::{Path, PathBuf};

use pagecolor_core::AnalyzerConfig;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagecolor")
        .join("config.json")
}

/// Config file in effect: the explicit `--config` path or the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<AnalyzerConfig> {
    let path = config_path(explicit);
    if explicit.is_some() || path.exists() {
        Ok(AnalyzerConfig::from_file(Path::new(&path))?)
    } else {
        Ok(AnalyzerConfig::default())
    }
}
