//! Services module for invoice-actions.

pub mod cache;
pub mod credentials;
pub mod database;
pub mod metrics;
pub mod store;

pub use cache::{CachedListing, ListingCache, PathRevalidator};
pub use credentials::{
    AuthServiceClient, CredentialsProvider, Principal, SignInError, CREDENTIALS_PROVIDER,
};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use store::InvoiceStore;
