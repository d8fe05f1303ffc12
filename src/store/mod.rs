//! `RecordStore` adapters.
//!
//! - [`SqliteStore`]: the durable backend used by the binary.
//! - [`MemoryStore`]: an in-process backend for tests and ephemeral runs.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
