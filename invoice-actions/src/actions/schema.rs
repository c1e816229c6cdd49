//! Form schemas for the invoice actions.
//!
//! Create, update and delete read the same invoice fields: create omits `id`,
//! update omits nothing the user may change, delete only needs `id`. `date`
//! never comes from the form. Raw text is coerced first so the rules see typed
//! values: a blank amount is checked as 0, a non-numeric one as absent.

use crate::models::{FormData, InvoiceChanges, InvoiceStatus};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::borrow::Cow;
use std::str::FromStr;
use validator::{Validate, ValidationError, ValidationErrors};

pub const CUSTOMER_MESSAGE: &str = "Please select a customer";
pub const AMOUNT_MESSAGE: &str = "Please enter an amount great than $0";
pub const STATUS_MESSAGE: &str = "Please select an invoice status";
pub const ID_MESSAGE: &str = "Missing invoice id";

/// Fields required to create an invoice.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateInvoiceShape {
    #[validate(required(message = "Please select a customer"))]
    pub customer_id: Option<String>,

    #[validate(
        required(message = "Please enter an amount great than $0"),
        custom(function = "validate_amount")
    )]
    pub amount: Option<Decimal>,

    #[validate(
        required(message = "Please select an invoice status"),
        custom(function = "validate_status")
    )]
    pub status: Option<String>,
}

/// Fields required to update an invoice.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateInvoiceShape {
    #[validate(required(message = "Missing invoice id"), custom(function = "validate_id"))]
    pub id: Option<String>,

    #[validate(required(message = "Please select a customer"))]
    pub customer_id: Option<String>,

    #[validate(
        required(message = "Please enter an amount great than $0"),
        custom(function = "validate_amount")
    )]
    pub amount: Option<Decimal>,

    #[validate(
        required(message = "Please select an invoice status"),
        custom(function = "validate_status")
    )]
    pub status: Option<String>,
}

/// Fields required to delete an invoice.
#[derive(Debug, Clone, Default, Validate)]
pub struct DeleteInvoiceShape {
    #[validate(required(message = "Missing invoice id"), custom(function = "validate_id"))]
    pub id: Option<String>,
}

/// Validated customer, amount and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    pub customer_id: String,
    pub amount_in_cents: i64,
    pub status: InvoiceStatus,
}

impl CreateInvoiceShape {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            customer_id: form.get("customerId").map(str::to_string),
            amount: coerce_amount(form.get("amount")),
            status: form.get("status").map(str::to_string),
        }
    }

    pub fn parse(form: &FormData) -> Result<InvoiceFields, FieldErrors> {
        let shape = Self::from_form(form);
        shape.validate()?;
        invoice_fields(shape.customer_id, shape.amount, shape.status)
    }
}

impl UpdateInvoiceShape {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            id: form.get("id").map(str::to_string),
            customer_id: form.get("customerId").map(str::to_string),
            amount: coerce_amount(form.get("amount")),
            status: form.get("status").map(str::to_string),
        }
    }

    pub fn parse(form: &FormData) -> Result<InvoiceChanges, FieldErrors> {
        let shape = Self::from_form(form);
        shape.validate()?;

        let id = shape.id.ok_or_else(|| FieldErrors {
            id: Some(vec![ID_MESSAGE.to_string()]),
            ..FieldErrors::default()
        })?;
        let fields = invoice_fields(shape.customer_id, shape.amount, shape.status)?;

        Ok(InvoiceChanges {
            id,
            customer_id: fields.customer_id,
            amount_in_cents: fields.amount_in_cents,
            status: fields.status,
        })
    }
}

impl DeleteInvoiceShape {
    pub fn from_form(form: &FormData) -> Self {
        Self {
            id: form.get("id").map(str::to_string),
        }
    }

    pub fn parse(form: &FormData) -> Result<String, FieldErrors> {
        let shape = Self::from_form(form);
        shape.validate()?;
        shape.id.ok_or_else(|| FieldErrors {
            id: Some(vec![ID_MESSAGE.to_string()]),
            ..FieldErrors::default()
        })
    }
}

fn invoice_fields(
    customer_id: Option<String>,
    amount: Option<Decimal>,
    status: Option<String>,
) -> Result<InvoiceFields, FieldErrors> {
    let amount_in_cents = amount.as_ref().and_then(to_cents);
    let status = status.as_deref().and_then(InvoiceStatus::parse);

    match (customer_id, amount_in_cents, status) {
        (Some(customer_id), Some(amount_in_cents), Some(status)) => Ok(InvoiceFields {
            customer_id,
            amount_in_cents,
            status,
        }),
        (customer_id, amount_in_cents, status) => Err(FieldErrors {
            id: None,
            customer_id: customer_id
                .is_none()
                .then(|| vec![CUSTOMER_MESSAGE.to_string()]),
            amount: amount_in_cents
                .is_none()
                .then(|| vec![AMOUNT_MESSAGE.to_string()]),
            status: status.is_none().then(|| vec![STATUS_MESSAGE.to_string()]),
        }),
    }
}

/// Coerce submitted amount text to a number.
///
/// Missing or blank text is zero; text that is not a number is `None`.
pub fn coerce_amount(raw: Option<&str>) -> Option<Decimal> {
    let text = raw.unwrap_or_default().trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// `round(amount * 100)`, halves away from zero. `None` if it does not fit in i64.
pub fn to_cents(amount: &Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    match to_cents(amount) {
        Some(cents) if *amount > Decimal::ZERO && cents > 0 => Ok(()),
        _ => Err(field_error("amount", AMOUNT_MESSAGE)),
    }
}

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match InvoiceStatus::parse(status) {
        Some(_) => Ok(()),
        None => Err(field_error("status", STATUS_MESSAGE)),
    }
}

fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(field_error("id", ID_MESSAGE));
    }
    Ok(())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Per-field error messages, keyed the way the form names its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.customer_id.is_none()
            && self.amount.is_none()
            && self.status.is_none()
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();

            let name: &str = &field;
            let slot = match name {
                "id" => &mut fields.id,
                "customer_id" => &mut fields.customer_id,
                "amount" => &mut fields.amount,
                "status" => &mut fields.status,
                _ => continue,
            };
            slot.get_or_insert_with(Vec::new).extend(messages);
        }

        fields
    }
}
