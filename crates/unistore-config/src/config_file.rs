use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = ".unistore-demo.toml";

const APP_NAME: &str = "unistore-demo";

/// Locations searched for the config file, in priority order
///
/// 1. `./.unistore-demo.toml`
/// 2. `<config dir>/unistore-demo/config.toml` (e.g. `~/.config/unistore-demo/config.toml`)
/// 3. `~/.unistore-demo.toml`
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(APP_NAME).join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(CONFIG_FILE));
    }
    candidates
}

/// Load the content of the first existing config file
///
/// Returns `Ok(None)` if no candidate exists. A candidate that exists but
/// can't be read is an error rather than being skipped.
pub fn load_config_file() -> Result<Option<(PathBuf, String)>, ConfigError> {
    match config_file_candidates().into_iter().find(|path| path.is_file()) {
        Some(path) => {
            let content = read_config_file(&path)?;
            Ok(Some((path, content)))
        }
        None => Ok(None),
    }
}

/// Read a config file from an explicit path
pub fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
