//! Listing cache and path revalidation.

use crate::models::Invoice;
use crate::services::metrics::LISTING_CACHE_TOTAL;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Marks the cached rendering of a route stale.
pub trait PathRevalidator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// A rendered listing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedListing {
    pub invoices: Vec<Invoice>,
    pub rendered_at: DateTime<Utc>,
}

/// Listing snapshots keyed by route path.
///
/// Readers take a generation before loading and store the result only if no
/// revalidation happened in between, so a slow load never resurrects data that
/// a mutation already invalidated.
#[derive(Debug, Default)]
pub struct ListingCache {
    entries: DashMap<String, CachedListing>,
    generation: AtomicU64,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<CachedListing> {
        let hit = self.entries.get(path).map(|entry| entry.value().clone());
        let result = if hit.is_some() { "hit" } else { "miss" };
        LISTING_CACHE_TOTAL.with_label_values(&[result]).inc();
        hit
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cache `invoices` for `path` unless the cache was revalidated after `generation`.
    pub fn insert_if_current(
        &self,
        path: &str,
        generation: u64,
        invoices: Vec<Invoice>,
    ) -> CachedListing {
        let listing = CachedListing {
            invoices,
            rendered_at: Utc::now(),
        };

        // The generation is compared under the shard lock. A revalidation bumps
        // the generation before it removes, so its remove either sees this
        // entry or this check sees the new generation.
        match self.entries.entry(path.to_string()) {
            Entry::Occupied(mut entry) if self.generation() == generation => {
                entry.insert(listing.clone());
            }
            Entry::Vacant(entry) if self.generation() == generation => {
                entry.insert(listing.clone());
            }
            _ => debug!(path, "Listing changed while loading, not caching"),
        }

        listing
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }
}

impl PathRevalidator for ListingCache {
    fn revalidate_path(&self, path: &str) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.entries.remove(path).is_some() {
            debug!(path, "Listing revalidated");
        }
    }
}
