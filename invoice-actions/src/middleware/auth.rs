use crate::handlers::auth::SESSION_ACCESS_TOKEN;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Redirect to `/login` unless the session holds an access token.
pub async fn require_session(session: Session, request: Request, next: Next) -> Response {
    let access_token: Option<String> = match session.get(SESSION_ACCESS_TOKEN).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read session, treating as signed out");
            None
        }
    };

    if access_token.is_none() {
        tracing::debug!(path = %request.uri().path(), "No session, redirecting to login");
        return Redirect::to("/login").into_response();
    }

    next.run(request).await
}
