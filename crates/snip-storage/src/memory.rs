use async_trait::async_trait;
use parking_lot::RwLock;
use snip_core::kv::{AtomicWrite, Key, KvStore, Mutation, Result};
use std::collections::BTreeMap;
use std::ops::Bound;

/// In-memory implementation of the [`KvStore`] contract.
///
/// Entries live in a `BTreeMap` so prefix scans come back in key order.
/// Atomic batches are evaluated and applied under a single write lock.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<BTreeMap<Key, Vec<u8>>>,
}

impl MemoryKv {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &Key) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &Key, value: Vec<u8>) -> Result<()> {
        self.entries.write().insert(key.clone(), value);
        Ok(())
    }

    async fn delete(&self, key: &Key) -> Result<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    async fn list(&self, prefix: &Key) -> Result<Vec<(Key, Vec<u8>)>> {
        let entries = self.entries.read();
        let found = entries
            .range((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(found)
    }

    async fn atomic(&self, write: AtomicWrite) -> Result<bool> {
        let (checks, mutations) = write.into_parts();
        let mut entries = self.entries.write();

        let checks_hold = checks
            .iter()
            .all(|check| entries.get(&check.key) == check.expected.as_ref());
        if !checks_hold {
            return Ok(false);
        }

        for mutation in mutations {
            match mutation {
                Mutation::Set { key, value } => {
                    entries.insert(key, value);
                }
                Mutation::Delete { key } => {
                    entries.remove(&key);
                }
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(id: &str) -> Key {
        Key::new(["links", id])
    }

    #[tokio::test]
    async fn set_and_get() {
        let kv = MemoryKv::new();

        kv.set(&key("abc"), b"one".to_vec()).await.unwrap();

        assert_eq!(kv.get(&key("abc")).await.unwrap(), Some(b"one".to_vec()));
        assert_eq!(kv.get(&key("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_overwrites() {
        let kv = MemoryKv::new();

        kv.set(&key("abc"), b"one".to_vec()).await.unwrap();
        kv.set(&key("abc"), b"two".to_vec()).await.unwrap();

        assert_eq!(kv.get(&key("abc")).await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(kv.len(), 1);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let kv = MemoryKv::new();
        kv.set(&key("abc"), b"one".to_vec()).await.unwrap();

        assert!(kv.delete(&key("abc")).await.unwrap());
        assert!(!kv.delete(&key("abc")).await.unwrap());
        assert!(kv.is_empty());
    }

    #[tokio::test]
    async fn list_returns_prefix_in_key_order() {
        let kv = MemoryKv::new();
        kv.set(&key("b"), b"2".to_vec()).await.unwrap();
        kv.set(&Key::new(["other", "a"]), b"x".to_vec())
            .await
            .unwrap();
        kv.set(&key("a"), b"1".to_vec()).await.unwrap();
        kv.set(&Key::new(["linksx", "a"]), b"y".to_vec())
            .await
            .unwrap();

        let listed = kv.list(&Key::new(["links"])).await.unwrap();

        assert_eq!(
            listed,
            vec![(key("a"), b"1".to_vec()), (key("b"), b"2".to_vec())]
        );
    }

    #[tokio::test]
    async fn atomic_applies_when_checks_hold() {
        let kv = MemoryKv::new();
        kv.set(&key("old"), b"v".to_vec()).await.unwrap();

        let committed = kv
            .atomic(
                AtomicWrite::new()
                    .check_value(key("old"), b"v".to_vec())
                    .check_absent(key("new"))
                    .delete(key("old"))
                    .set(key("new"), b"v".to_vec()),
            )
            .await
            .unwrap();

        assert!(committed);
        assert_eq!(kv.get(&key("old")).await.unwrap(), None);
        assert_eq!(kv.get(&key("new")).await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn atomic_writes_nothing_when_a_check_fails() {
        let kv = MemoryKv::new();
        kv.set(&key("old"), b"v".to_vec()).await.unwrap();
        kv.set(&key("new"), b"taken".to_vec()).await.unwrap();

        let committed = kv
            .atomic(
                AtomicWrite::new()
                    .check_value(key("old"), b"v".to_vec())
                    .check_absent(key("new"))
                    .delete(key("old"))
                    .set(key("new"), b"v".to_vec()),
            )
            .await
            .unwrap();

        assert!(!committed);
        assert_eq!(kv.get(&key("old")).await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(kv.get(&key("new")).await.unwrap(), Some(b"taken".to_vec()));
    }

    #[tokio::test]
    async fn atomic_value_check_detects_stale_reads() {
        let kv = MemoryKv::new();
        kv.set(&key("abc"), b"v2".to_vec()).await.unwrap();

        let committed = kv
            .atomic(
                AtomicWrite::new()
                    .check_value(key("abc"), b"v1".to_vec())
                    .set(key("abc"), b"v1+1".to_vec()),
            )
            .await
            .unwrap();

        assert!(!committed);
        assert_eq!(kv.get(&key("abc")).await.unwrap(), Some(b"v2".to_vec()));
    }

    #[tokio::test]
    async fn concurrent_access() {
        let kv = Arc::new(MemoryKv::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let kv = Arc::clone(&kv);
            handles.push(tokio::spawn(async move {
                let k = Key::new(["links".to_string(), format!("code-{:03}", i)]);
                kv.set(&k, format!("https://example{}.com", i).into_bytes())
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let listed = kv.list(&Key::new(["links"])).await.unwrap();
        assert_eq!(listed.len(), 10);
        assert_eq!(listed[0].0, key("code-000"));
        assert_eq!(listed[9].0, key("code-009"));
    }
}
