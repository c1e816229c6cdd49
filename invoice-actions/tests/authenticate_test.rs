//! authenticate integration tests.

mod common;

use common::{form, RecordingStore, StubCredentials, TestRouter};
use invoice_actions::actions::{AuthOutcome, InvoiceActions};
use invoice_actions::services::{ListingCache, SignInError};
use std::sync::Arc;

fn actions_with(credentials: Arc<StubCredentials>) -> InvoiceActions {
    InvoiceActions::new(
        Arc::new(RecordingStore::default()),
        Arc::new(ListingCache::new()),
        credentials,
    )
}

#[tokio::test]
async fn signs_in_with_the_credentials_provider() {
    let credentials = Arc::new(StubCredentials::accepting());
    let actions = actions_with(credentials.clone());

    let outcome = actions
        .authenticate(
            None,
            &form(&[("email", "user@nextmail.com"), ("password", "123456")]),
        )
        .await
        .unwrap();

    match outcome {
        AuthOutcome::SignedIn(principal) => assert_eq!(principal.email, "user@nextmail.com"),
        other => panic!("expected sign-in, got {:?}", other),
    }
    let calls = credentials.calls.lock().unwrap();
    assert_eq!(calls[0].0, "credentials");
    assert_eq!(calls[0].1.get("password"), Some("123456"));
}

#[tokio::test]
async fn wrong_password_returns_credential_signin() {
    let actions = actions_with(Arc::new(StubCredentials::accepting()));

    let outcome = actions
        .authenticate(
            Some("earlier message"),
            &form(&[("email", "user@nextmail.com"), ("password", "nope")]),
        )
        .await
        .unwrap();

    assert_eq!(outcome, AuthOutcome::Rejected("CredentialSignin"));
}

#[tokio::test]
async fn network_error_propagates() {
    let actions = actions_with(Arc::new(StubCredentials::failing(|| {
        SignInError::Network("connection refused".into())
    })));

    let result = actions.authenticate(None, &form(&[])).await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("NetworkError"));
}

#[tokio::test]
async fn login_route_maps_outcomes_to_responses() {
    let app = TestRouter::new(RecordingStore::default());

    let ok = app
        .send(common::form_request(
            "/login",
            "email=user%40nextmail.com&password=123456",
            None,
        ))
        .await;
    assert_eq!(ok.status(), 303);
    assert_eq!(ok.headers().get("location").unwrap(), "/dashboard/invoices");

    let rejected = app
        .send(common::form_request(
            "/login",
            "email=user%40nextmail.com&password=wrong",
            None,
        ))
        .await;
    assert_eq!(rejected.status(), 401);
    assert_eq!(
        common::body_json(rejected).await,
        serde_json::json!({ "error": "CredentialSignin" })
    );
}

#[tokio::test]
async fn login_route_reports_provider_outage_as_bad_gateway() {
    let app = TestRouter::with_credentials(
        RecordingStore::default(),
        StubCredentials::failing(|| SignInError::Network("timeout".into())),
    );

    let response = app
        .send(common::form_request("/login", "email=a%40b.c&password=x", None))
        .await;

    assert_eq!(response.status(), 502);
}
