//! The normalized Pokemon record.

use serde::{Deserialize, Serialize};

/// Number of moves kept from the provider payload.
pub const MAX_MOVES: usize = 4;

/// Raw payload as yielded by the provider port, before normalization.
///
/// Carries the full move list; the cap to [`MAX_MOVES`] happens in
/// [`Record::from_raw`] so the truncation rule lives in one place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPokemon {
    /// Upstream identifier
    pub id: i64,
    /// Upstream name (PokeAPI serves these lowercase already)
    pub name: String,
    /// Full move list in upstream order
    pub moves: Vec<String>,
    /// Type list in upstream order (slot order, duplicates kept)
    pub types: Vec<String>,
}

/// A normalized, immutable Pokemon record.
///
/// Created only by the coordinator after a successful provider fetch;
/// the only mutations it ever sees afterwards are insert and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Primary external key, immutable once set
    pub id: i64,
    /// Lowercase lookup name
    pub name: String,
    /// At most [`MAX_MOVES`] moves, upstream order preserved
    pub moves: Vec<String>,
    /// Types in upstream order, not deduplicated
    pub types: Vec<String>,
}

impl Record {
    /// Normalize a raw provider payload into a record.
    ///
    /// Name is case-folded, the move list is capped to the first
    /// [`MAX_MOVES`] entries in upstream order, and the type list is kept
    /// verbatim. Order is meaningful on both lists and is never re-sorted.
    pub fn from_raw(raw: RawPokemon) -> Self {
        let RawPokemon {
            id,
            name,
            mut moves,
            types,
        } = raw;
        moves.truncate(MAX_MOVES);
        Self {
            id,
            name: name.to_lowercase(),
            moves,
            types,
        }
    }

    /// Whether this record's type list contains `type_name`.
    ///
    /// Callers normalize case before the comparison, matching the lookup
    /// convention everywhere else in the crate.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t == type_name)
    }
}
