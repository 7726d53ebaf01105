//! In-memory customer table.
//!
//! Used by `--offline` mode and tests. Assigns ids and timestamps the way
//! the hosted table does and enforces email uniqueness like the real schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use custreg_core::customer::{Customer, CustomerRepository, NewCustomer, sort_recent_first};
use custreg_core::error::{CustomerError, Result};

/// Process-local stand-in for the remote table.
#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    /// Rows in insertion order.
    rows: Arc<RwLock<Vec<Customer>>>,
    fail_inserts: Arc<AtomicBool>,
    fail_queries: Arc<AtomicBool>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with rows, given in insertion order.
    pub fn with_rows(rows: Vec<Customer>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            ..Self::default()
        }
    }

    /// Makes every subsequent insert fail with a 503.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent query fail with a 503.
    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Inserts with an explicit timestamp.
    pub async fn insert_at(&self, customer: &NewCustomer, created_at: DateTime<Utc>) -> Result<Customer> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(CustomerError::remote(503, "insert unavailable"));
        }

        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.email.eq_ignore_ascii_case(&customer.email)) {
            return Err(CustomerError::remote(
                409,
                "duplicate key value violates unique constraint \"customers_email_key\"",
            ));
        }

        let row = Customer::from_new(Uuid::new_v4().to_string(), customer.clone(), created_at);
        rows.push(row.clone());
        tracing::debug!(id = %row.id, "Stored customer in memory");
        Ok(row)
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn insert(&self, customer: &NewCustomer) -> Result<()> {
        self.insert_at(customer, Utc::now()).await.map(|_| ())
    }

    async fn list_recent_first(&self) -> Result<Vec<Customer>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(CustomerError::remote(503, "query unavailable"));
        }
        let rows = self.rows.read().await.clone();
        Ok(sort_recent_first(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            phone: None,
            company: None,
            designation: None,
            linkedin_url: None,
            instagram_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamp() {
        let repo = InMemoryCustomerRepository::new();
        repo.insert(&new_customer("jane@example.com")).await.unwrap();

        let rows = repo.list_recent_first().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(Uuid::parse_str(&rows[0].id).is_ok());
        assert_eq!(rows[0].phone, None);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryCustomerRepository::new();
        repo.insert(&new_customer("jane@example.com")).await.unwrap();
        let err = repo.insert(&new_customer("JANE@example.com")).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_is_recent_first_with_stable_ties() {
        let repo = InMemoryCustomerRepository::new();
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        repo.insert_at(&new_customer("a@example.com"), t(1)).await.unwrap();
        repo.insert_at(&new_customer("b@example.com"), t(3)).await.unwrap();
        repo.insert_at(&new_customer("c@example.com"), t(3)).await.unwrap();

        let first: Vec<_> = repo.list_recent_first().await.unwrap().into_iter().map(|c| c.email).collect();
        let second: Vec<_> = repo.list_recent_first().await.unwrap().into_iter().map(|c| c.email).collect();
        assert_eq!(first, vec!["c@example.com", "b@example.com", "a@example.com"]);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let repo = InMemoryCustomerRepository::new();
        repo.fail_inserts(true);
        assert!(repo.insert(&new_customer("a@example.com")).await.is_err());
        repo.fail_inserts(false);
        repo.insert(&new_customer("a@example.com")).await.unwrap();

        repo.fail_queries(true);
        assert!(repo.list_recent_first().await.unwrap_err().is_remote());
    }
}
