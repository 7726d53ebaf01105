pub mod config;
pub mod list;
pub mod register;

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use custreg_application::list_view::{self, CustomerListView, ListBody};
use custreg_application::{AppBootstrap, RepositoryMode};
use custreg_core::config::RootConfig;
use custreg_infrastructure::ConfigService;
use custreg_infrastructure::logging::init_logging;
use custreg_infrastructure::paths::CustregPaths;
use tracing_appender::non_blocking::WorkerGuard;

/// Shared state for a single invocation.
pub struct Context {
    pub service: ConfigService,
    pub config: RootConfig,
    pub mode: RepositoryMode,
    _log_guard: Option<WorkerGuard>,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, offline: bool) -> Result<Self> {
        let service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new()?,
        };
        let config = service.get_config()?;

        let log_dir = CustregPaths::logs_dir().ok();
        let log_guard = init_logging(&config.logging, log_dir.as_deref());
        tracing::debug!(config = %service.path().display(), offline, "Loaded configuration");

        let mode = if offline {
            RepositoryMode::Offline
        } else {
            RepositoryMode::Remote
        };

        Ok(Self {
            service,
            config,
            mode,
            _log_guard: log_guard,
        })
    }

    pub fn bootstrap(&self) -> Result<AppBootstrap> {
        if self.mode == RepositoryMode::Remote && !self.config.supabase.is_configured() {
            anyhow::bail!(
                "Supabase is not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY, \
                 edit {}, or pass --offline.",
                self.service.path().display()
            );
        }
        Ok(AppBootstrap::new(&self.config, self.mode)?)
    }
}

pub fn print_list(view: &CustomerListView) {
    println!("{}", list_view::TITLE.bright_magenta().bold());
    println!("{}", view.summary.bright_black());
    println!();
    match view.body {
        ListBody::Loading => println!("{}", list_view::LOADING.yellow()),
        ListBody::Empty => {
            println!("{}", list_view::EMPTY);
            println!("{}", list_view::EMPTY_HINT.bright_black());
        }
        ListBody::Rows(_) => println!("{}", view.render_body()),
    }
}
