//! Domain layer: the Pokemon record entity and the ports the service
//! depends on.
//!
//! Infrastructure adapters (`crate::provider`, `crate::store`) implement the
//! port traits; the coordinator in `crate::service` only ever talks to the
//! traits.

pub mod ports;
pub mod record;

pub use ports::{PokemonProvider, RecordStore};
pub use record::{RawPokemon, Record, MAX_MOVES};
