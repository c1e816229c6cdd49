//! Application startup and lifecycle management.

use crate::actions::InvoiceActions;
use crate::config::InvoiceActionsConfig;
use crate::handlers::{auth, health, invoices};
use crate::middleware::{auth::require_session, metrics::metrics_middleware};
use crate::services::{
    init_metrics, AuthServiceClient, CredentialsProvider, Database, InvoiceStore, ListingCache,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{http_request_span, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub actions: InvoiceActions,
    pub store: Arc<dyn InvoiceStore>,
    pub listing_cache: Arc<ListingCache>,
}

impl AppState {
    /// Wire the actions to `store` and `credentials`, with the listing cache as revalidator.
    pub fn new(store: Arc<dyn InvoiceStore>, credentials: Arc<dyn CredentialsProvider>) -> Self {
        let listing_cache = Arc::new(ListingCache::new());
        let actions = InvoiceActions::new(store.clone(), listing_cache.clone(), credentials);

        Self {
            actions,
            store,
            listing_cache,
        }
    }
}

pub fn build_router(state: AppState, secure_cookie: bool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    let dashboard = Router::new()
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/edit", post(invoices::update_invoice))
        .route("/invoices/:id/delete", post(invoices::delete_invoice))
        .route_layer(from_fn(require_session));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics_handler))
        .route("/login", post(auth::login_handler))
        .route("/logout", post(auth::logout_handler))
        .nest("/dashboard", dashboard)
        .route_layer(from_fn(metrics_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http().make_span_with(http_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to Postgres, run migrations and bind the HTTP listener.
    pub async fn build(config: InvoiceActionsConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let credentials = Arc::new(AuthServiceClient::new(config.auth_service.url.clone()));
        tracing::info!(auth_service_url = %credentials.base_url(), "Auth service client created");

        let state = AppState::new(Arc::new(db), credentials);
        let router = build_router(state, config.session.secure_cookie);

        let addr: SocketAddr = config.common.address().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid listen address {}: {}",
                config.common.address(),
                e
            ))
        })?;
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!(error = %e, addr = %addr, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "HTTP listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "invoice-actions",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, self.router).await.map_err(|e| {
            tracing::error!(error = %e, "HTTP server error");
            std::io::Error::other(format!("HTTP server error: {}", e))
        })
    }
}
