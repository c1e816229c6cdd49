use super::schema::{CreateInvoiceShape, DeleteInvoiceShape, UpdateInvoiceShape};
use super::{ActionOutcome, ActionState, InvoiceActions};
use crate::models::{FormData, NewInvoice};
use crate::services::metrics::ERRORS_TOTAL;
use chrono::Utc;
use tracing::{error, info, instrument};

pub const CREATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Create Invoice";
pub const CREATE_ERROR_MESSAGE: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_ERROR_MESSAGE: &str = "Error to Update";
pub const DELETE_VALIDATION_MESSAGE: &str = "Missing Fields. Failed to Delete Invoice.";
pub const DELETE_ERROR_MESSAGE: &str = "Error to Delete";

impl InvoiceActions {
    /// Create an invoice dated today from `customerId`, `amount` and `status`.
    ///
    /// `_previous_state` is the form's last rendered state; it is not read.
    #[instrument(skip_all)]
    pub async fn create_invoice(
        &self,
        _previous_state: &ActionState,
        form: &FormData,
    ) -> ActionOutcome {
        let outcome = self.run_create(form).await;
        Self::record("create", &outcome);
        outcome
    }

    async fn run_create(&self, form: &FormData) -> ActionOutcome {
        let fields = match CreateInvoiceShape::parse(form) {
            Ok(fields) => fields,
            Err(errors) => {
                return ActionOutcome::validation_failed(errors, CREATE_VALIDATION_MESSAGE)
            }
        };

        let invoice = NewInvoice {
            customer_id: fields.customer_id,
            amount_in_cents: fields.amount_in_cents,
            status: fields.status,
            date: Utc::now().date_naive(),
        };

        if let Err(e) = self.store.insert_invoice(&invoice).await {
            error!(error = %e, "Failed to create invoice");
            ERRORS_TOTAL.with_label_values(&["create_invoice"]).inc();
            return ActionOutcome::error(CREATE_ERROR_MESSAGE);
        }

        info!(
            customer_id = %invoice.customer_id,
            amount = invoice.amount_in_cents,
            status = invoice.status.as_str(),
            "Invoice created"
        );

        self.finish_mutation()
    }

    /// Update customer, amount and status of the invoice named by `id`.
    #[instrument(skip_all, fields(invoice_id = form.get("id").unwrap_or("-")))]
    pub async fn update_invoice(&self, form: &FormData) -> ActionOutcome {
        let outcome = self.run_update(form).await;
        Self::record("update", &outcome);
        outcome
    }

    async fn run_update(&self, form: &FormData) -> ActionOutcome {
        let changes = match UpdateInvoiceShape::parse(form) {
            Ok(changes) => changes,
            Err(errors) => {
                return ActionOutcome::validation_failed(errors, UPDATE_VALIDATION_MESSAGE)
            }
        };

        if let Err(e) = self.store.update_invoice(&changes).await {
            error!(error = %e, "Failed to update invoice");
            ERRORS_TOTAL.with_label_values(&["update_invoice"]).inc();
            return ActionOutcome::error(UPDATE_ERROR_MESSAGE);
        }

        info!(
            amount = changes.amount_in_cents,
            status = changes.status.as_str(),
            "Invoice updated"
        );

        self.finish_mutation()
    }

    /// Delete the invoice named by `id`. An id that matches nothing still succeeds.
    #[instrument(skip_all, fields(invoice_id = form.get("id").unwrap_or("-")))]
    pub async fn delete_invoice(&self, form: &FormData) -> ActionOutcome {
        let outcome = self.run_delete(form).await;
        Self::record("delete", &outcome);
        outcome
    }

    async fn run_delete(&self, form: &FormData) -> ActionOutcome {
        let id = match DeleteInvoiceShape::parse(form) {
            Ok(id) => id,
            Err(errors) => {
                return ActionOutcome::validation_failed(errors, DELETE_VALIDATION_MESSAGE)
            }
        };

        if let Err(e) = self.store.delete_invoice(&id).await {
            error!(error = %e, "Failed to delete invoice");
            ERRORS_TOTAL.with_label_values(&["delete_invoice"]).inc();
            return ActionOutcome::error(DELETE_ERROR_MESSAGE);
        }

        info!("Invoice deleted");

        self.finish_mutation()
    }
}
