use crate::actions::{AuthOutcome, INVOICES_PATH};
use crate::models::FormData;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde_json::json;
use service_core::error::AppError;
use tower_sessions::Session;

pub const SESSION_ACCESS_TOKEN: &str = "access_token";
pub const SESSION_USER_ID: &str = "user_id";
pub const SESSION_EMAIL: &str = "email";

pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<FormData>,
) -> Result<Response, AppError> {
    let outcome = state.actions.authenticate(None, &form).await.map_err(|e| {
        tracing::error!(error = %e, "Sign-in failed");
        AppError::BadGateway(e.to_string())
    })?;

    let principal = match outcome {
        AuthOutcome::SignedIn(principal) => principal,
        AuthOutcome::Rejected(reason) => {
            return Ok((StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response())
        }
    };

    // Fresh id on privilege change.
    session.cycle_id().await.map_err(session_error)?;
    session
        .insert(SESSION_ACCESS_TOKEN, &principal.access_token)
        .await
        .map_err(session_error)?;
    session
        .insert(SESSION_USER_ID, &principal.user_id)
        .await
        .map_err(session_error)?;
    session
        .insert(SESSION_EMAIL, &principal.email)
        .await
        .map_err(session_error)?;

    tracing::info!(
        user_id = %principal.user_id,
        email = %principal.email,
        "User logged in successfully"
    );

    Ok(Redirect::to(INVOICES_PATH).into_response())
}

pub async fn logout_handler(session: Session) -> impl IntoResponse {
    session.clear().await;
    Redirect::to("/login")
}

fn session_error(e: tower_sessions::session::Error) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Session error: {}", e))
}
