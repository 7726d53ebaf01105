//! Test doubles for the customer table.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use custreg_core::customer::{Customer, CustomerRepository, NewCustomer};
use custreg_core::error::{CustomerError, Result};
use tokio::sync::oneshot;

/// Repository whose responses are released by the test.
///
/// Every `list_recent_first` call parks until the test answers it through
/// [`ScriptedRepository::answer_list`]. Inserts are recorded and succeed
/// unless `fail_inserts` is set; `hold_inserts` parks them until
/// [`ScriptedRepository::release_insert`].
#[derive(Default)]
pub struct ScriptedRepository {
    inserts: Mutex<Vec<NewCustomer>>,
    fail_inserts: AtomicBool,
    hold_inserts: AtomicBool,
    held_insert: Mutex<Option<oneshot::Sender<()>>>,
    pending_lists: Mutex<Vec<Option<oneshot::Sender<Result<Vec<Customer>>>>>>,
}

impl ScriptedRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn hold_inserts(&self) {
        self.hold_inserts.store(true, Ordering::SeqCst);
    }

    pub fn inserts(&self) -> Vec<NewCustomer> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn insert_is_held(&self) -> bool {
        self.held_insert.lock().unwrap().is_some()
    }

    pub fn release_insert(&self) {
        if let Some(tx) = self.held_insert.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }

    /// Number of list calls issued so far.
    pub fn list_calls(&self) -> usize {
        self.pending_lists.lock().unwrap().len()
    }

    /// Answers the `index`-th list call (0-based, in issue order).
    pub fn answer_list(&self, index: usize, result: Result<Vec<Customer>>) {
        let tx = self.pending_lists.lock().unwrap()[index]
            .take()
            .expect("list call already answered");
        let _ = tx.send(result);
    }

    pub async fn wait_for_list_calls(&self, count: usize) {
        while self.list_calls() < count {
            tokio::task::yield_now().await;
        }
    }

    pub async fn wait_for_held_insert(&self) {
        while !self.insert_is_held() {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl CustomerRepository for ScriptedRepository {
    async fn insert(&self, customer: &NewCustomer) -> Result<()> {
        self.inserts.lock().unwrap().push(customer.clone());

        if self.hold_inserts.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            *self.held_insert.lock().unwrap() = Some(tx);
            let _ = rx.await;
        }

        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(CustomerError::remote(
                409,
                "duplicate key value violates unique constraint \"customers_email_key\"",
            ));
        }
        Ok(())
    }

    async fn list_recent_first(&self) -> Result<Vec<Customer>> {
        let (tx, rx) = oneshot::channel();
        self.pending_lists.lock().unwrap().push(Some(tx));
        rx.await
            .unwrap_or_else(|_| Err(CustomerError::internal("list call dropped")))
    }
}

pub fn customer(id: &str, created_secs: i64) -> Customer {
    Customer {
        id: id.to_string(),
        name: format!("Customer {id}"),
        email: format!("{id}@example.com"),
        phone: None,
        company: None,
        designation: None,
        linkedin_url: None,
        instagram_id: None,
        created_at: Utc.timestamp_opt(created_secs, 0).unwrap(),
    }
}
