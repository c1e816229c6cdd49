//! update_invoice integration tests.

mod common;

use common::{form, TestActions, TEST_CUSTOMER_ID, TEST_INVOICE_ID};
use invoice_actions::actions::{ActionOutcome, UPDATE_ERROR_MESSAGE, UPDATE_VALIDATION_MESSAGE};
use invoice_actions::models::{InvoiceChanges, InvoiceStatus};

#[tokio::test]
async fn updates_customer_amount_and_status() {
    let test = TestActions::new();

    let outcome = test
        .actions
        .update_invoice(&form(&[
            ("id", TEST_INVOICE_ID),
            ("customerId", TEST_CUSTOMER_ID),
            ("amount", "99.99"),
            ("status", "paid"),
        ]))
        .await;

    assert_eq!(outcome, ActionOutcome::Redirect("/dashboard/invoices".into()));
    assert_eq!(
        *test.store.updated.lock().unwrap(),
        vec![InvoiceChanges {
            id: TEST_INVOICE_ID.to_string(),
            customer_id: TEST_CUSTOMER_ID.to_string(),
            amount_in_cents: 9999,
            status: InvoiceStatus::Paid,
        }]
    );
    assert_eq!(
        test.events(),
        vec!["update".to_string(), "revalidate /dashboard/invoices".to_string()]
    );
}

#[tokio::test]
async fn invalid_update_returns_failure_instead_of_touching_store() {
    let test = TestActions::new();

    let outcome = test
        .actions
        .update_invoice(&form(&[
            ("id", TEST_INVOICE_ID),
            ("customerId", "c1"),
            ("amount", "-1"),
            ("status", "paid"),
        ]))
        .await;

    let state = outcome.state().unwrap();
    assert_eq!(state.message.as_deref(), Some(UPDATE_VALIDATION_MESSAGE));
    assert_eq!(
        state.errors.unwrap().amount,
        Some(vec!["Please enter an amount great than $0".to_string()])
    );
    assert!(test.events().is_empty());
}

#[tokio::test]
async fn blank_id_is_reported_with_other_fields() {
    let test = TestActions::new();

    let outcome = test
        .actions
        .update_invoice(&form(&[("id", "  "), ("amount", "4"), ("status", "sent")]))
        .await;

    match outcome {
        ActionOutcome::ValidationFailed { errors, .. } => {
            assert_eq!(errors.id, Some(vec!["Missing invoice id".to_string()]));
            assert_eq!(
                errors.customer_id,
                Some(vec!["Please select a customer".to_string()])
            );
            assert_eq!(
                errors.status,
                Some(vec!["Please select an invoice status".to_string()])
            );
            assert_eq!(errors.amount, None);
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(test.store.write_count(), 0);
}

#[tokio::test]
async fn store_failure_returns_error_to_update() {
    let test = TestActions::with_failing_store();

    let outcome = test
        .actions
        .update_invoice(&form(&[
            ("id", TEST_INVOICE_ID),
            ("customerId", "c1"),
            ("amount", "10"),
            ("status", "pending"),
        ]))
        .await;

    assert_eq!(
        outcome,
        ActionOutcome::Error {
            message: UPDATE_ERROR_MESSAGE.to_string()
        }
    );
    assert!(!test.events().contains(&"revalidate /dashboard/invoices".to_string()));
}
