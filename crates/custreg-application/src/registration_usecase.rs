//! Customer registration use case.
//!
//! Owns the form state and coordinates validation, the insert call, the
//! user-visible notification and the refresh signal towards the list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use custreg_core::customer::{
    CustomerField, CustomerForm, CustomerRepository, FieldErrors, Validation, validate,
    validate_field,
};
use custreg_core::notification::Notification;
use custreg_core::refresh::RefreshTrigger;
use tokio::sync::watch;

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Insert succeeded; the form was reset and a refresh fired.
    Registered {
        notification: Notification,
        /// Refresh generation fired for this registration.
        generation: u64,
    },
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// Insert failed; the form keeps the entered values.
    Failed(Notification),
    /// Another submission is still in flight.
    Busy,
}

impl SubmitOutcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            SubmitOutcome::Registered { notification, .. } | SubmitOutcome::Failed(notification) => {
                Some(notification)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct FormState {
    form: CustomerForm,
    errors: FieldErrors,
    /// Bumped on every edit so stale debounced validations are dropped.
    edits: HashMap<CustomerField, u64>,
}

/// Clears the in-flight flag on every exit path of `submit`.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Submission workflow for the registration form.
pub struct RegistrationUseCase {
    repository: Arc<dyn CustomerRepository>,
    refresh: RefreshTrigger,
    state: Arc<Mutex<FormState>>,
    errors_tx: Arc<watch::Sender<FieldErrors>>,
    submitting: AtomicBool,
    debounce: Duration,
}

impl RegistrationUseCase {
    /// Creates a use case that validates edited fields immediately.
    pub fn new(repository: Arc<dyn CustomerRepository>, refresh: RefreshTrigger) -> Self {
        let (errors_tx, _) = watch::channel(FieldErrors::new());
        Self {
            repository,
            refresh,
            state: Arc::new(Mutex::new(FormState::default())),
            errors_tx: Arc::new(errors_tx),
            submitting: AtomicBool::new(false),
            debounce: Duration::ZERO,
        }
    }

    /// Sets the quiet period before an edited field is validated.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
        state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current raw form values.
    pub fn form(&self) -> CustomerForm {
        Self::lock(&self.state).form.clone()
    }

    /// Inline field errors currently shown.
    pub fn errors(&self) -> FieldErrors {
        Self::lock(&self.state).errors.clone()
    }

    /// Observes inline error changes (debounced validation, submit, reset).
    pub fn subscribe_errors(&self) -> watch::Receiver<FieldErrors> {
        self.errors_tx.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Stores a raw value and schedules validation of that field.
    ///
    /// Outside a Tokio runtime, or with a zero debounce, the field is
    /// validated immediately.
    pub fn set_field(&self, field: CustomerField, value: impl Into<String>) {
        let edit = {
            let mut state = Self::lock(&self.state);
            state.form.set(field, value);
            let counter = state.edits.entry(field).or_default();
            *counter += 1;
            *counter
        };

        let handle = tokio::runtime::Handle::try_current().ok();
        match handle.filter(|_| !self.debounce.is_zero()) {
            Some(handle) => {
                let state = Arc::clone(&self.state);
                let errors_tx = Arc::clone(&self.errors_tx);
                let delay = self.debounce;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    Self::validate_edit(&state, &errors_tx, field, edit);
                });
            }
            None => Self::validate_edit(&self.state, &self.errors_tx, field, edit),
        }
    }

    /// Applies the validation of one edit if no newer edit superseded it.
    fn validate_edit(
        state: &Mutex<FormState>,
        errors_tx: &watch::Sender<FieldErrors>,
        field: CustomerField,
        edit: u64,
    ) {
        let mut state = Self::lock(state);
        if state.edits.get(&field).copied() != Some(edit) {
            return;
        }

        let result = validate_field(field, state.form.get(field));
        let changed = match result {
            Ok(_) => state.errors.remove(field).is_some(),
            Err(message) => {
                let changed = state.errors.get(field) != Some(message.as_str());
                state.errors.insert(field, message);
                changed
            }
        };
        if changed {
            errors_tx.send_replace(state.errors.clone());
        }
    }

    /// Restores the empty form and drops pending validations.
    pub fn reset(&self) {
        let mut state = Self::lock(&self.state);
        state.form = CustomerForm::default();
        state.errors.clear();
        for counter in state.edits.values_mut() {
            *counter += 1;
        }
        self.errors_tx.send_replace(FieldErrors::new());
    }

    /// Validates the form and, if valid, inserts it.
    ///
    /// Only one submission runs at a time; concurrent calls return
    /// [`SubmitOutcome::Busy`] without touching the repository. The refresh
    /// signal fires once, after the insert has completed successfully.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Submission already in flight; ignoring");
            return SubmitOutcome::Busy;
        }
        let _guard = SubmittingGuard(&self.submitting);

        let form = self.form();
        let customer = match validate(&form) {
            Validation::Valid(customer) => {
                self.replace_errors(FieldErrors::new());
                customer
            }
            Validation::Invalid(errors) => {
                tracing::debug!(fields = errors.len(), "Registration form invalid");
                self.replace_errors(errors.clone());
                return SubmitOutcome::Invalid(errors);
            }
        };

        match self.repository.insert(&customer).await {
            Ok(()) => {
                self.reset();
                let generation = self.refresh.fire();
                tracing::info!(generation, "Customer registered");
                SubmitOutcome::Registered {
                    notification: Notification::registered(),
                    generation,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "Customer registration failed");
                SubmitOutcome::Failed(Notification::registration_failed())
            }
        }
    }

    fn replace_errors(&self, errors: FieldErrors) {
        let mut state = Self::lock(&self.state);
        state.errors = errors.clone();
        self.errors_tx.send_replace(errors);
    }
}
