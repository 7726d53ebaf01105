//! Customer domain module.
//!
//! # Module Structure
//!
//! - `field`: field catalogue with per-field constraints and messages
//! - `form`: raw form input
//! - `model`: `NewCustomer` insert payload and stored `Customer` rows
//! - `validation`: pure form validation
//! - `repository`: trait for the remote customer table
//!
//! # Usage
//!
//! ```ignore
//! use custreg_core::customer::{CustomerForm, Validation, validate};
//! use custreg_core::customer::CustomerRepository;
//! ```

mod field;
mod form;
mod model;
pub mod repository;
mod validation;

// Re-export public API
pub use field::{CustomerField, FieldFormat, UnknownField};
pub use form::CustomerForm;
pub use model::{Customer, NewCustomer, sort_recent_first};
pub use repository::CustomerRepository;
pub use validation::{FieldErrors, Validation, validate, validate_field};
