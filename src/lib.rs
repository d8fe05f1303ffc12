//! Pokestore - a small Pokedex record service.
//!
//! Given a Pokemon name, the service fetches the canonical data from the
//! PokeAPI (unless already cached or persisted), normalizes it, stores it in
//! SQLite, and serves it and its siblings over a small REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        HTTP layer (hyper)                     │
//! └──────────────────────────────┬────────────────────────────────┘
//!                                │
//!                    ┌───────────▼───────────┐
//!                    │    PokemonService     │  per-name single-flight
//!                    │     (coordinator)     │  gates + double-check
//!                    └───┬───────┬───────┬───┘
//!                        │       │       │
//!                ┌───────▼──┐ ┌──▼────┐ ┌▼─────────┐
//!                │ TtlCache │ │ Store │ │ PokeAPI  │
//!                │ (600 s)  │ │(SQLite)│ │ (reqwest)│
//!                └──────────┘ └───────┘ └──────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`] - name-keyed TTL cache with lazy expiry
//! - [`domain`] - the `Record` entity and the store/provider ports
//! - [`error`] - error taxonomy
//! - [`http`] - REST surface, health and metrics endpoints
//! - [`metrics`] - prometheus counters
//! - [`provider`] - PokeAPI client
//! - [`service`] - the fetch-cache-persist coordinator
//! - [`store`] - SQLite and in-memory store adapters

pub mod cache;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod provider;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use cache::TtlCache;
pub use domain::{PokemonProvider, RawPokemon, Record, RecordStore};
pub use error::{Error, Result};
pub use provider::{PokeApi, PokeApiConfig};
pub use service::PokemonService;
pub use store::{MemoryStore, SqliteStore};
