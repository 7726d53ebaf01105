//! Customer repository trait.
//!
//! Defines the interface of the hosted table this client sits on top of.

use async_trait::async_trait;

use super::model::{Customer, NewCustomer};
use crate::error::Result;

/// The remote customer table.
///
/// This trait decouples the registration workflow and the list loader from
/// the concrete store (PostgREST over HTTP, in-memory, scripted test doubles).
///
/// # Implementation Notes
///
/// - `insert` must not send `id` or `created_at`; both are assigned by the store.
/// - `list_recent_first` returns the full table ordered by `created_at`
///   descending. No pagination or filtering.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Inserts one row.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Row accepted by the store
    /// - `Err(_)`: Any failure (transport, constraint violation, ...)
    async fn insert(&self, customer: &NewCustomer) -> Result<()>;

    /// Lists every row, newest first.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Customer>)`: All stored rows
    /// - `Err(_)`: Error occurred during the query
    async fn list_recent_first(&self) -> Result<Vec<Customer>>;
}
