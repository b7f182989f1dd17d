//! Core types and traits for the Snip link shortener.
//!
//! This crate provides the link record, its validated identifier and the
//! key-value engine contract shared by the storage engines and the link
//! service.

pub mod error;
pub mod kv;
pub mod link;

pub use error::{CoreError, StorageError};
pub use kv::{AtomicWrite, Check, Key, KvStore, Mutation};
pub use link::{Link, LinkId};
