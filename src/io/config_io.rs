use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "TICK_DIR";

/// Error type for locating and reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a data directory; pass --dir or set TICK_DIR")]
    NoDataDir,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Pick the data directory: explicit flag, then `$TICK_DIR`, then the
/// platform data dir (`~/.local/share/tick` on Linux).
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("tick"))
        .ok_or(ConfigError::NoDataDir)
}

/// Read `config.toml` from the data directory. A missing file yields defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = data_dir.join("config.toml");
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}
