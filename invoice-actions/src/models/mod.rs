//! Domain models for invoice-actions.

mod form;
mod invoice;

pub use form::FormData;
pub use invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
