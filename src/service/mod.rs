//! Fetch-cache-persist coordinator.
//!
//! `PokemonService::ensure` is the single entry point that decides, for a
//! given name, whether to serve from the TTL cache, the durable store, or the
//! upstream provider. Concurrent calls for the same name collapse into one
//! provider fetch and one insert; unrelated names proceed in parallel.
//!
//! ```text
//! ensure(name)
//!   ├─ cache hit (no lock) ──────────────────────────────▶ record
//!   └─ per-name flight gate
//!        ├─ cache hit (double-check) ─────────────────────▶ record
//!        ├─ store hit ── repopulate cache ────────────────▶ record
//!        └─ provider ── normalize ── persist ── cache ────▶ record
//! ```
//!
//! Read and delete operations go straight to the store and never take a
//! flight gate; they are not in the single-flight path because they never
//! call the provider.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::cache::TtlCache;
use crate::domain::{PokemonProvider, Record, RecordStore};
use crate::error::Result;
use crate::metrics;

/// Process-wide coordinator. Constructed once at startup and shared by
/// reference with every request handler.
pub struct PokemonService {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn PokemonProvider>,
    cache: TtlCache,
    /// Per-name flight gates. An entry exists only while at least one
    /// `ensure` call for that name is in flight.
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl PokemonService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn PokemonProvider>,
        cache: TtlCache,
    ) -> Self {
        Self {
            store,
            provider,
            cache,
            flights: DashMap::new(),
        }
    }

    /// Fetch `name` from cache, store, or the upstream provider, persisting
    /// and caching on the way back.
    ///
    /// For any single name, at most one provider call and at most one insert
    /// happen per cache-miss window; late arrivals observe the winner's
    /// cached result through the double-check inside the gate.
    #[instrument(skip(self))]
    pub async fn ensure(&self, name: &str) -> Result<Record> {
        let name = name.to_lowercase();

        // Fast path: unexpired cache entry, no gate needed for this read.
        if let Some(record) = self.cache.get(&name) {
            debug!("serving cached record for {}", name);
            return Ok(record);
        }

        let gate = self
            .flights
            .entry(name.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = gate.lock().await;
            self.fetch_within_gate(&name).await
        };

        // Drop the gate once nobody else holds a clone: our clone plus the
        // map's own reference account for a strong count of 2.
        self.flights
            .remove_if(&name, |_, gate| Arc::strong_count(gate) <= 2);

        result
    }

    /// The slow path, called with the flight gate for `name` held.
    async fn fetch_within_gate(&self, name: &str) -> Result<Record> {
        // Double-check: another caller may have completed the fetch while we
        // waited for the gate.
        if let Some(record) = self.cache.get(name) {
            debug!("gate double-check hit for {}", name);
            return Ok(record);
        }

        // The store is the source of truth on cache miss; a warm database
        // must not trigger a refetch.
        if let Some(record) = self.store.find_by_name(name).await? {
            debug!("store hit for {}, repopulating cache", name);
            self.cache.set(name, record.clone());
            return Ok(record);
        }

        info!("fetching {} from upstream", name);
        let raw = self.provider.fetch(name).await?;
        let record = Record::from_raw(raw);

        // Persist before caching: the cache must never hold a record that is
        // not durably stored.
        self.store.insert(&record).await?;
        metrics::RECORDS_PERSISTED.inc();

        self.cache.set(name, record.clone());
        info!("fetched and persisted {} (id {})", record.name, record.id);
        Ok(record)
    }

    /// Look a record up in the store by case-insensitive name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Record>> {
        self.store.find_by_name(&name.to_lowercase()).await
    }

    /// All stored records.
    pub async fn list_all(&self) -> Result<Vec<Record>> {
        self.store.find_all().await
    }

    /// Delete by upstream id. The cache is not consulted: records are cached
    /// by name and the id path does not know which name was affected, so a
    /// cached copy may outlive the row for up to one TTL.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let count = self.store.delete_by_id(id).await?;
        if count > 0 {
            metrics::RECORDS_DELETED.with_label_values(&["id"]).inc_by(count);
            info!("deleted record with id {}", id);
        }
        Ok(count > 0)
    }

    /// Delete by case-insensitive name, invalidating the cache entry so a
    /// subsequent `ensure` refetches instead of serving the deleted record.
    #[instrument(skip(self))]
    pub async fn delete_by_name(&self, name: &str) -> Result<bool> {
        let name = name.to_lowercase();
        let count = self.store.delete_by_name(&name).await?;
        if count == 0 {
            return Ok(false);
        }

        self.cache.delete(&name);
        metrics::RECORDS_DELETED.with_label_values(&["name"]).inc_by(count);
        info!("deleted record named {}", name);
        Ok(true)
    }

    /// Delete every record whose type list contains the given type name,
    /// case-insensitively. Like the id path, affected cache entries are not
    /// invalidated and age out with the TTL.
    #[instrument(skip(self))]
    pub async fn delete_by_type(&self, type_name: &str) -> Result<bool> {
        let type_name = type_name.to_lowercase();
        let count = self.store.delete_by_type(&type_name).await?;
        if count > 0 {
            metrics::RECORDS_DELETED.with_label_values(&["type"]).inc_by(count);
            info!("deleted {} record(s) with type {}", count, type_name);
        }
        Ok(count > 0)
    }

    /// Cache counters, for diagnostics.
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Number of flight gates currently alive.
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
