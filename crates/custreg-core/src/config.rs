//! Configuration model.
//!
//! Loaded from `~/.config/custreg/config.toml` by the infrastructure layer.
//! Every section has defaults so a partial file (or none at all) is valid.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE: &str = "customers";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RootConfig {
    #[serde(default)]
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub form: FormSettings,
}

/// Connection settings for the hosted table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    #[serde(default)]
    pub url: String,
    /// Public anon key sent as `apikey` and bearer token.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SupabaseSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }

    /// Copy safe to print: the key is masked.
    pub fn redacted(&self) -> Self {
        let anon_key = if self.anon_key.is_empty() {
            String::new()
        } else {
            "********".to_string()
        };
        Self {
            anon_key,
            ..self.clone()
        }
    }
}

impl Default for SupabaseSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub log_to_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_file: false,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FormSettings {
    /// Quiet period before a changed field is validated. 0 validates immediately.
    #[serde(default = "default_debounce_ms")]
    pub validation_debounce_ms: u64,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            validation_debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}
