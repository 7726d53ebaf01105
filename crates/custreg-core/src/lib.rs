//! Domain layer for the customer registration client.
//!
//! Pure types and rules: the customer model, form validation, the repository
//! trait the hosted table is reached through, the refresh signal and the
//! notifications shown to the user. Nothing in this crate performs I/O.

pub mod config;
pub mod customer;
pub mod error;
pub mod notification;
pub mod refresh;

// Re-export common error type
pub use error::CustomerError;
