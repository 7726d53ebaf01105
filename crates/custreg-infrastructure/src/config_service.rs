//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/custreg/config.toml` and
//! layers environment overrides on top.

use crate::paths::CustregPaths;
use custreg_core::config::RootConfig;
use custreg_core::error::{CustomerError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Environment variables that override file values, applied after the file.
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_TABLE: &str = "CUSTREG_TABLE";
pub const ENV_LOG: &str = "CUSTREG_LOG";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the default config path.
    pub fn new() -> Result<Self> {
        let path = CustregPaths::config_file().map_err(|e| CustomerError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a ConfigService reading a custom path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the effective configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = Self::load_from(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    /// Reads a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(RootConfig::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CustomerError::io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: RootConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Writes a template config file if none exists and returns its path.
    ///
    /// On Unix the file is created with mode 600 since it holds the anon key.
    pub fn ensure_config_file(&self) -> Result<PathBuf> {
        if self.path.exists() {
            return Ok(self.path.clone());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template = toml::to_string_pretty(&RootConfig::default())?;
        fs::write(&self.path, template)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        tracing::info!("Created config template at {}", self.path.display());
        Ok(self.path.clone())
    }
}

/// Applies environment overrides. `lookup` returns a variable's value.
///
/// Blank values are ignored so an exported-but-empty variable does not wipe
/// a value from the file.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_SUPABASE_URL) {
        config.supabase.url = url;
    }
    if let Some(key) = get(ENV_SUPABASE_ANON_KEY) {
        config.supabase.anon_key = key;
    }
    if let Some(table) = get(ENV_TABLE) {
        config.supabase.table = table;
    }
    if let Some(level) = get(ENV_LOG) {
        config.logging.level = level;
    }
}
