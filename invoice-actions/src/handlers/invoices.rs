use crate::actions::{ActionOutcome, ActionState, INVOICES_PATH};
use crate::models::{FormData, Invoice};
use crate::services::CachedListing;
use crate::startup::AppState;
use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    Form, Json,
};
use service_core::error::AppError;

/// Listing page data, served from the listing cache when fresh.
pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<CachedListing>, AppError> {
    if let Some(listing) = state.listing_cache.get(INVOICES_PATH) {
        return Ok(Json(listing));
    }

    let generation = state.listing_cache.generation();
    let invoices = state.store.fetch_invoices().await?;

    Ok(Json(state.listing_cache.insert_if_current(
        INVOICES_PATH,
        generation,
        invoices,
    )))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invoice>, AppError> {
    state
        .store
        .fetch_invoice_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(anyhow!("Invoice {} not found", id)))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<FormData>,
) -> ActionOutcome {
    state
        .actions
        .create_invoice(&ActionState::default(), &form)
        .await
}

/// The path segment names the invoice; a form `id` field is overridden.
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(mut form): Form<FormData>,
) -> ActionOutcome {
    form.set("id", id);
    state.actions.update_invoice(&form).await
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(mut form): Form<FormData>,
) -> ActionOutcome {
    form.set("id", id);
    state.actions.delete_invoice(&form).await
}
