//! Path management for custreg configuration and log files.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for custreg.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/custreg/
/// ├── config.toml              # Connection, logging and form settings
/// └── logs/                    # Application logs
///     └── custreg.log.YYYY-MM-DD
/// ```
pub struct CustregPaths;

impl CustregPaths {
    const APP_DIR: &'static str = "custreg";

    /// Returns the configuration directory (`~/.config/custreg/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join(Self::APP_DIR))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file() {
        let config_file = CustregPaths::config_file().unwrap();
        assert!(config_file.ends_with("custreg/config.toml"));
        let config_dir = CustregPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = CustregPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
        let config_dir = CustregPaths::config_dir().unwrap();
        assert!(logs_dir.starts_with(&config_dir));
    }
}
