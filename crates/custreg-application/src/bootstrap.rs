//! Wiring of repository, refresh signal and use cases.

use std::sync::Arc;
use std::time::Duration;

use custreg_core::config::RootConfig;
use custreg_core::customer::CustomerRepository;
use custreg_core::error::Result;
use custreg_core::refresh::{RefreshListener, RefreshSignal};
use custreg_infrastructure::{InMemoryCustomerRepository, SupabaseCustomerRepository};
use tokio::task::JoinHandle;

use crate::customer_list_loader::{CustomerListLoader, ReloadOutcome};
use crate::registration_usecase::RegistrationUseCase;

/// Which collaborator the application talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepositoryMode {
    /// The configured Supabase project.
    #[default]
    Remote,
    /// A process-local table that starts empty.
    Offline,
}

/// The assembled application.
///
/// The registration use case and the list loader only share the refresh
/// channel created here.
pub struct AppBootstrap {
    pub registration: Arc<RegistrationUseCase>,
    pub list_loader: CustomerListLoader,
    refresh_listener: Option<RefreshListener>,
}

impl AppBootstrap {
    /// Builds the application from configuration.
    pub fn new(config: &RootConfig, mode: RepositoryMode) -> Result<Self> {
        let repository: Arc<dyn CustomerRepository> = match mode {
            RepositoryMode::Remote => {
                tracing::info!(table = %config.supabase.table, "Using Supabase customer table");
                Arc::new(SupabaseCustomerRepository::new(&config.supabase)?)
            }
            RepositoryMode::Offline => {
                tracing::info!("Using in-memory customer table");
                Arc::new(InMemoryCustomerRepository::new())
            }
        };
        Ok(Self::with_repository(
            repository,
            Duration::from_millis(config.form.validation_debounce_ms),
        ))
    }

    /// Builds the application around an existing repository.
    pub fn with_repository(repository: Arc<dyn CustomerRepository>, debounce: Duration) -> Self {
        let (trigger, listener) = RefreshSignal::channel();
        let registration =
            RegistrationUseCase::new(Arc::clone(&repository), trigger).with_debounce(debounce);
        let list_loader = CustomerListLoader::new(repository);

        Self {
            registration: Arc::new(registration),
            list_loader,
            refresh_listener: Some(listener),
        }
    }

    /// Performs the initial list load and starts following refresh events.
    ///
    /// Returns `None` if the list was already mounted.
    pub fn mount_list(&mut self) -> Option<JoinHandle<ReloadOutcome>> {
        let listener = self.refresh_listener.take()?;
        Some(self.list_loader.mount(listener))
    }
}
