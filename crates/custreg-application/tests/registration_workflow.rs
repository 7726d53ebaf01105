mod common;

use std::sync::Arc;

use common::ScriptedRepository;
use custreg_application::{RegistrationUseCase, SubmitOutcome};
use custreg_core::customer::{CustomerField, CustomerForm, NewCustomer};
use custreg_core::notification::{Notification, NotificationVariant};
use custreg_core::refresh::{RefreshListener, RefreshSignal};

fn setup(repo: &Arc<ScriptedRepository>) -> (Arc<RegistrationUseCase>, RefreshListener) {
    let (trigger, listener) = RefreshSignal::channel();
    let registration = RegistrationUseCase::new(repo.clone(), trigger);
    (Arc::new(registration), listener)
}

fn fill(registration: &RegistrationUseCase, values: &[(CustomerField, &str)]) {
    for (field, value) in values {
        registration.set_field(*field, *value);
    }
}

fn jane_doe() -> Vec<(CustomerField, &'static str)> {
    vec![
        (CustomerField::Name, "Jane Doe"),
        (CustomerField::Email, "jane@example.com"),
        (CustomerField::Phone, ""),
        (CustomerField::Company, ""),
        (CustomerField::Designation, ""),
        (CustomerField::LinkedinUrl, ""),
        (CustomerField::InstagramId, ""),
    ]
}

#[tokio::test]
async fn blank_name_never_reaches_the_table() {
    for name in ["", "    "] {
        let repo = Arc::new(ScriptedRepository::new());
        let (registration, mut listener) = setup(&repo);
        fill(&registration, &[(CustomerField::Name, name), (CustomerField::Email, "jane@example.com")]);

        match registration.submit().await {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(errors.get(CustomerField::Name), Some("Name is required"));
            }
            other => panic!("expected invalid, got {other:?}"),
        }
        assert!(repo.inserts().is_empty());
        assert!(listener.try_recv().is_none());
        // the form keeps what was typed
        assert_eq!(registration.form().email, "jane@example.com");
    }
}

#[tokio::test]
async fn long_name_reports_length_error_first() {
    let repo = Arc::new(ScriptedRepository::new());
    let (registration, _listener) = setup(&repo);
    let long_name = "x".repeat(101);
    fill(
        &registration,
        &[
            (CustomerField::Name, long_name.as_str()),
            (CustomerField::Email, "jane(at)example.com"),
            (CustomerField::LinkedinUrl, "not a url"),
        ],
    );

    let SubmitOutcome::Invalid(errors) = registration.submit().await else {
        panic!("expected invalid");
    };
    let first = errors.iter().next().unwrap();
    assert_eq!(first, (CustomerField::Name, "Name must be less than 100 characters"));
    assert_eq!(errors.get(CustomerField::Email), Some("Invalid email address"));
    assert_eq!(errors.get(CustomerField::LinkedinUrl), Some("Invalid URL"));
    assert_eq!(registration.errors(), errors);
    assert!(repo.inserts().is_empty());
}

#[tokio::test]
async fn successful_submit_inserts_nulls_resets_and_refreshes_once() {
    let repo = Arc::new(ScriptedRepository::new());
    let (registration, mut listener) = setup(&repo);
    fill(&registration, &jane_doe());

    let outcome = registration.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Registered {
            notification: Notification::registered(),
            generation: 1,
        }
    );
    assert_eq!(
        repo.inserts(),
        vec![NewCustomer {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            company: None,
            designation: None,
            linkedin_url: None,
            instagram_id: None,
        }]
    );
    assert_eq!(registration.form(), CustomerForm::default());
    assert!(registration.errors().is_empty());

    assert_eq!(listener.recv().await.map(|e| e.generation), Some(1));
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn failed_insert_keeps_form_and_reports_generic_error() {
    let repo = Arc::new(ScriptedRepository::new());
    repo.fail_inserts();
    let (registration, mut listener) = setup(&repo);
    fill(&registration, &jane_doe());
    registration.set_field(CustomerField::Company, "Acme");
    let before = registration.form();

    let outcome = registration.submit().await;

    let SubmitOutcome::Failed(notification) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(notification.title, "Error");
    assert_eq!(
        notification.description,
        "Failed to register customer. Please try again."
    );
    assert_eq!(notification.variant, NotificationVariant::Destructive);
    // the cause (a unique constraint) is not exposed
    assert!(!notification.description.contains("duplicate"));

    assert_eq!(registration.form(), before);
    assert_eq!(repo.inserts().len(), 1);
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let repo = Arc::new(ScriptedRepository::new());
    repo.hold_inserts();
    let (registration, mut listener) = setup(&repo);
    fill(&registration, &jane_doe());

    let first = tokio::spawn({
        let registration = registration.clone();
        async move { registration.submit().await }
    });
    repo.wait_for_held_insert().await;

    assert!(registration.is_submitting());
    assert_eq!(registration.submit().await, SubmitOutcome::Busy);

    repo.release_insert();
    let outcome = first.await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Registered { generation: 1, .. }));
    assert!(!registration.is_submitting());
    assert_eq!(repo.inserts().len(), 1);

    assert_eq!(listener.recv().await.map(|e| e.generation), Some(1));
    assert!(listener.try_recv().is_none());
}

#[tokio::test]
async fn each_registration_advances_the_signal_by_one() {
    let repo = Arc::new(ScriptedRepository::new());
    let (registration, mut listener) = setup(&repo);

    for (i, email) in ["a@example.com", "b@example.com"].into_iter().enumerate() {
        fill(&registration, &[(CustomerField::Name, "Someone"), (CustomerField::Email, email)]);
        let SubmitOutcome::Registered { generation, .. } = registration.submit().await else {
            panic!("expected registration");
        };
        assert_eq!(generation, i as u64 + 1);
    }

    assert_eq!(listener.recv().await.map(|e| e.generation), Some(1));
    assert_eq!(listener.recv().await.map(|e| e.generation), Some(2));
}
