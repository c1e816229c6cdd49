//! Invoice model for invoice-actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Exact match on the submitted form value; anything else is not a status.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// Invoice row as stored. `amount` is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: String,
    pub date: NaiveDate,
}

/// Input for inserting an invoice. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Input for updating an invoice. `date` is fixed at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub id: String,
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
}
