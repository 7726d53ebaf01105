//! Infrastructure layer: collaborator adapters, configuration and logging.

pub mod config_service;
pub mod in_memory_customer_repository;
pub mod logging;
pub mod paths;
pub mod supabase_customer_repository;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_customer_repository::InMemoryCustomerRepository;
pub use crate::supabase_customer_repository::SupabaseCustomerRepository;
