//! Application layer for the customer registration client.
//!
//! Use cases that coordinate the domain rules with the collaborator:
//! submitting the registration form and keeping the customer list fresh.

pub mod bootstrap;
pub mod customer_list_loader;
pub mod list_view;
pub mod registration_usecase;

pub use bootstrap::{AppBootstrap, RepositoryMode};
pub use customer_list_loader::{CustomerListLoader, ListSnapshot, ReloadOutcome};
pub use list_view::{CustomerListView, CustomerRow, ListBody};
pub use registration_usecase::{RegistrationUseCase, SubmitOutcome};
