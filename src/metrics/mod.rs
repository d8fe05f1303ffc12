//! Prometheus counters for the service.
//!
//! Registered lazily against the default registry and exposed by the HTTP
//! layer at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

/// Requests issued to the upstream provider.
pub static PROVIDER_REQUESTS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pokestore_provider_requests_total",
        "Total number of PokeAPI lookups issued"
    )
    .expect("metric registration")
});

/// Provider failures by kind (`not_found`, `unavailable`).
pub static PROVIDER_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pokestore_provider_errors_total",
        "Total number of failed PokeAPI lookups",
        &["kind"]
    )
    .expect("metric registration")
});

/// Cache hits on the record cache.
pub static CACHE_HITS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pokestore_cache_hits_total",
        "Record cache hits (unexpired entries served)"
    )
    .expect("metric registration")
});

/// Cache misses on the record cache.
pub static CACHE_MISSES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pokestore_cache_misses_total",
        "Record cache misses (absent or expired entries)"
    )
    .expect("metric registration")
});

/// Records written to the durable store.
pub static RECORDS_PERSISTED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "pokestore_records_persisted_total",
        "Records inserted into the durable store"
    )
    .expect("metric registration")
});

/// Records removed from the durable store, by delete key (`id`, `name`, `type`).
pub static RECORDS_DELETED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "pokestore_records_deleted_total",
        "Records removed from the durable store",
        &["by"]
    )
    .expect("metric registration")
});
