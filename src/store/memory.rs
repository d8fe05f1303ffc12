//! In-memory record store.
//!
//! Backs tests and ephemeral runs. Same contract as the SQLite adapter:
//! callers normalize names and type names before calling, comparisons here
//! are verbatim.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Record, RecordStore};
use crate::error::Result;

/// Vec-backed `RecordStore` adapter.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: &Record) -> Result<()> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Record>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok((before - records.len()) as u64)
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.name != name);
        Ok((before - records.len()) as u64)
    }

    async fn delete_by_type(&self, type_name: &str) -> Result<u64> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| !r.has_type(type_name));
        Ok((before - records.len()) as u64)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, types: &[&str]) -> Record {
        Record {
            id,
            name: name.to_string(),
            moves: vec![],
            types: types.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_insert_find() {
        let store = MemoryStore::new();
        store.insert(&record(25, "pikachu", &["electric"])).await.unwrap();

        let found = store.find_by_name("pikachu").await.unwrap().unwrap();
        assert_eq!(found.id, 25);
        assert!(store.find_by_name("raichu").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_id_counts() {
        let store = MemoryStore::new();
        store.insert(&record(25, "pikachu", &["electric"])).await.unwrap();

        assert_eq!(store.delete_by_id(25).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(25).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_type_membership() {
        let store = MemoryStore::new();
        store
            .insert(&record(6, "charizard", &["fire", "flying"]))
            .await
            .unwrap();
        store
            .insert(&record(18, "pidgeot", &["normal", "flying"]))
            .await
            .unwrap();
        store.insert(&record(25, "pikachu", &["electric"])).await.unwrap();

        assert_eq!(store.delete_by_type("flying").await.unwrap(), 2);
        assert_eq!(store.len(), 1);
    }
}
