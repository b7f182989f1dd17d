//! Key-value engines and the typed link record store built on top of them.

pub mod link_store;
pub mod memory;
pub mod redis;

pub use link_store::{link_key, LinkStore, Versioned, LINKS_PREFIX};
pub use memory::MemoryKv;
pub use redis::RedisKv;
pub use snip_core::{KvStore, StorageError};
