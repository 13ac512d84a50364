//! Response caching for upstream API calls.
//!
//! This module is API-agnostic:
//! - `CacheStorage` backends hold raw entries (SQLite, memory, or nothing)
//! - `CacheStore` adds typed access and read-time TTL expiry
//! - `CacheLayer` does cache-first fetching with write-through on success

mod layer;
mod storage;
mod store;
mod traits;

pub use layer::CacheLayer;
pub use storage::{CacheStorage, MemoryStorage, NoopStorage, SqliteStorage};
pub use store::CacheStore;
pub use traits::{CacheResult, CacheSource, QueryKey, TtlPolicy};
