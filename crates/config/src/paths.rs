//! Path helpers for configuration and cache locations.
//!
//! Responsibilities:
//! - Determine the default config file and cache root paths.
//! - Use the `directories` crate for platform-appropriate locations.
//!
//! Does NOT handle:
//! - File I/O or config parsing (see `loader`).

use std::path::PathBuf;

use crate::loader::ConfigError;

fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
    directories::ProjectDirs::from("", "", "fleet-ssh").ok_or(ConfigError::NoProjectDirs)
}

/// Returns the default path to the configuration file.
///
/// - Linux/macOS: `~/.config/fleet-ssh/config.yaml`
/// - Windows: `%AppData%\fleet-ssh\config.yaml`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.config_dir().join("config.yaml"))
}

/// Returns the default cache root, under which the record store
/// (`instances/`) and `index.yaml` live.
pub fn default_cache_dir() -> Result<PathBuf, ConfigError> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_share_the_project_segment() {
        let config = default_config_path().unwrap();
        let cache = default_cache_dir().unwrap();

        assert!(config.to_string_lossy().contains("fleet-ssh"));
        assert!(cache.to_string_lossy().contains("fleet-ssh"));
        assert!(config.ends_with("fleet-ssh/config.yaml") || config.ends_with("config.yaml"));
    }
}
