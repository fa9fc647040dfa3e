//! Key-value storage for the indexes.
//!
//! The core only needs point reads and writes of opaque bytes, expressed by
//! [`KeyValueStore`]. [`IndexStore`] layers the key namespace and the entry
//! encoding on top of any backend.

mod adapter;
mod memory;
mod redis_store;

pub use adapter::IndexStore;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::error::StoreResult;

/// A key-value store holding opaque byte values.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key has never been written.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;
}
