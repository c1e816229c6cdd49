//! Form actions: validate, run one statement, revalidate the listing, redirect.
//!
//! Every action returns an [`ActionOutcome`] value. A successful mutation is
//! `Redirect`; the HTTP layer decides how to navigate.

mod auth;
mod invoices;
pub mod schema;

pub use auth::{AuthOutcome, CREDENTIAL_SIGNIN};
pub use invoices::{
    CREATE_ERROR_MESSAGE, CREATE_VALIDATION_MESSAGE, DELETE_ERROR_MESSAGE,
    DELETE_VALIDATION_MESSAGE, UPDATE_ERROR_MESSAGE, UPDATE_VALIDATION_MESSAGE,
};
pub use schema::FieldErrors;

use crate::services::metrics::INVOICE_ACTIONS_TOTAL;
use crate::services::{CredentialsProvider, InvoiceStore, PathRevalidator};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Listing route invalidated and redirected to after every successful mutation.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// What a form shows after a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Redirect(String),
    ValidationFailed { errors: FieldErrors, message: String },
    Error { message: String },
}

impl ActionOutcome {
    pub(crate) fn validation_failed(errors: FieldErrors, message: &str) -> Self {
        ActionOutcome::ValidationFailed {
            errors,
            message: message.to_string(),
        }
    }

    pub(crate) fn error(message: &str) -> Self {
        ActionOutcome::Error {
            message: message.to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect(_))
    }

    /// Form state to render, `None` for a redirect.
    pub fn state(&self) -> Option<ActionState> {
        match self {
            ActionOutcome::Redirect(_) => None,
            ActionOutcome::ValidationFailed { errors, message } => Some(ActionState {
                errors: Some(errors.clone()),
                message: Some(message.clone()),
            }),
            ActionOutcome::Error { message } => Some(ActionState {
                errors: None,
                message: Some(message.clone()),
            }),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ActionOutcome::Redirect(_) => "redirect",
            ActionOutcome::ValidationFailed { .. } => "validation_failed",
            ActionOutcome::Error { .. } => "error",
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        let status = match &self {
            ActionOutcome::Redirect(path) => return Redirect::to(path).into_response(),
            ActionOutcome::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ActionOutcome::Error { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self.state().unwrap_or_default())).into_response()
    }
}

/// The invoice form actions and the capabilities they run against.
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    revalidator: Arc<dyn PathRevalidator>,
    credentials: Arc<dyn CredentialsProvider>,
}

impl InvoiceActions {
    pub fn new(
        store: Arc<dyn InvoiceStore>,
        revalidator: Arc<dyn PathRevalidator>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            store,
            revalidator,
            credentials,
        }
    }

    /// Revalidate the listing and point the caller at it.
    fn finish_mutation(&self) -> ActionOutcome {
        self.revalidator.revalidate_path(INVOICES_PATH);
        ActionOutcome::Redirect(INVOICES_PATH.to_string())
    }

    fn record(action: &str, outcome: &ActionOutcome) {
        INVOICE_ACTIONS_TOTAL
            .with_label_values(&[action, outcome.label()])
            .inc();
    }
}
