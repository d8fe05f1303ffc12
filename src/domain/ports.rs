//! Domain ports.
//!
//! The coordinator depends on these traits only; the concrete PokeAPI client
//! and the SQLite/in-memory stores live behind them.

use async_trait::async_trait;

use crate::domain::record::{RawPokemon, Record};
use crate::error::Result;

/// Port for the upstream Pokemon provider.
///
/// One operation: look a Pokemon up by (already lowercased) name. Not-found
/// and transient failures are distinguished through the error taxonomy
/// (`ProviderNotFound` vs `ProviderUnavailable`); the implementation must
/// bound the call with a timeout.
#[async_trait]
pub trait PokemonProvider: Send + Sync {
    /// Fetch the raw payload for `name` from the upstream.
    async fn fetch(&self, name: &str) -> Result<RawPokemon>;
}

/// Port for durable record persistence.
///
/// Callers normalize names and type names to lowercase before any call;
/// the store compares verbatim. No transactional guarantees beyond per-call
/// atomicity. Delete operations return the number of rows removed, zero
/// meaning a valid negative result rather than an error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a record.
    async fn insert(&self, record: &Record) -> Result<()>;

    /// All stored records.
    async fn find_all(&self) -> Result<Vec<Record>>;

    /// Look a record up by its lowercase name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Record>>;

    /// Delete by upstream id, returning the number of rows removed.
    async fn delete_by_id(&self, id: i64) -> Result<u64>;

    /// Delete by lowercase name, returning the number of rows removed.
    async fn delete_by_name(&self, name: &str) -> Result<u64>;

    /// Delete every record whose type list contains `type_name`
    /// (membership test, may remove multiple rows).
    async fn delete_by_type(&self, type_name: &str) -> Result<u64>;
}
