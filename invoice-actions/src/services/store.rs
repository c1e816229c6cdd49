//! Persistence boundary for invoices.

use crate::models::{Invoice, InvoiceChanges, NewInvoice};
use async_trait::async_trait;
use service_core::error::AppError;

/// Single-statement invoice persistence.
///
/// Every method is one SQL statement; there are no multi-statement
/// transactions. Failures are reported as [`AppError::DatabaseError`].
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<(), AppError>;

    /// Matching zero rows is not an error.
    async fn update_invoice(&self, changes: &InvoiceChanges) -> Result<(), AppError>;

    /// Matching zero rows is not an error.
    async fn delete_invoice(&self, id: &str) -> Result<(), AppError>;

    /// All invoices, newest `date` first.
    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, AppError>;

    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
