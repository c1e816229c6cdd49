//! Database service for invoice-actions.

use crate::models::{Invoice, InvoiceChanges, NewInvoice};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::InvoiceStore;
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-actions"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

/// Ids are UUIDs in storage; anything else cannot match a row.
fn parse_uuid(value: &str, field: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value.trim())
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid {} '{}': {}", field, value, e)))
}

#[async_trait]
impl InvoiceStore for Database {
    #[instrument(skip(self, invoice), fields(customer_id = %invoice.customer_id, status = invoice.status.as_str()))]
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<(), AppError> {
        let customer_id = parse_uuid(&invoice.customer_id, "customer_id")?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_invoice"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(customer_id)
        .bind(invoice.amount_in_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        timer.observe_duration();

        info!(amount = invoice.amount_in_cents, date = %invoice.date, "Invoice created");

        Ok(())
    }

    #[instrument(skip(self, changes), fields(invoice_id = %changes.id))]
    async fn update_invoice(&self, changes: &InvoiceChanges) -> Result<(), AppError> {
        let invoice_id = parse_uuid(&changes.id, "invoice id")?;
        let customer_id = parse_uuid(&changes.customer_id, "customer_id")?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(customer_id)
        .bind(changes.amount_in_cents)
        .bind(changes.status.as_str())
        .bind(invoice_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        timer.observe_duration();

        info!(rows_affected = result.rows_affected(), "Invoice updated");

        Ok(())
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn delete_invoice(&self, id: &str) -> Result<(), AppError> {
        let invoice_id = parse_uuid(id, "invoice id")?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(invoice_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e))
            })?;

        timer.observe_duration();

        info!(rows_affected = result.rows_affected(), "Invoice deleted");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["fetch_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            ORDER BY date DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self), fields(invoice_id = %id))]
    async fn fetch_invoice_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let Ok(invoice_id) = parse_uuid(id, "invoice id") else {
            return Ok(None);
        };

        let timer = DB_QUERY_DURATION
            .with_label_values(&["fetch_invoice_by_id"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
