use snip_core::kv::{AtomicWrite, Key, KvStore, Result};
use snip_core::{Link, LinkId, StorageError};
use std::sync::Arc;
use tracing::trace;

/// First key segment of every link record.
pub const LINKS_PREFIX: &str = "links";

/// Storage key of the link `id`: `("links", id)`.
pub fn link_key(id: &LinkId) -> Key {
    Key::new([LINKS_PREFIX, id.as_str()])
}

/// A link together with the exact bytes it was read from.
///
/// The raw bytes are what compare-and-swap writes check against, so a
/// `Versioned` can only be written back if nobody changed the record since.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub link: Link,
    raw: Vec<u8>,
}

impl Versioned {
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

/// Typed access to link records over any [`KvStore`].
pub struct LinkStore<K> {
    kv: Arc<K>,
}

impl<K> Clone for LinkStore<K> {
    fn clone(&self) -> Self {
        Self {
            kv: Arc::clone(&self.kv),
        }
    }
}

impl<K: KvStore> LinkStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv: Arc::new(kv) }
    }

    pub fn from_arc(kv: Arc<K>) -> Self {
        Self { kv }
    }

    /// The underlying engine.
    pub fn kv(&self) -> &Arc<K> {
        &self.kv
    }

    pub async fn get(&self, id: &LinkId) -> Result<Option<Link>> {
        Ok(self.get_versioned(id).await?.map(|v| v.link))
    }

    /// Reads a record along with the bytes needed for a later CAS.
    pub async fn get_versioned(&self, id: &LinkId) -> Result<Option<Versioned>> {
        let Some(raw) = self.kv.get(&link_key(id)).await? else {
            return Ok(None);
        };
        let link = decode(&raw)?;
        Ok(Some(Versioned { link, raw }))
    }

    pub async fn exists(&self, id: &LinkId) -> Result<bool> {
        Ok(self.kv.get(&link_key(id)).await?.is_some())
    }

    /// Stores `link` only if its id is unused. Returns `false` if taken.
    pub async fn insert(&self, link: &Link) -> Result<bool> {
        let key = link_key(&link.id);
        let value = encode(link)?;
        let committed = self
            .kv
            .atomic(AtomicWrite::new().check_absent(key.clone()).set(key, value))
            .await?;
        trace!(id = %link.id, committed, "insert link");
        Ok(committed)
    }

    /// Overwrites `current` with `updated` if the stored bytes are unchanged.
    ///
    /// Both records must share an id. Returns `false` when the record was
    /// modified or deleted concurrently.
    pub async fn replace(&self, current: &Versioned, updated: &Link) -> Result<bool> {
        let key = link_key(&updated.id);
        let value = encode(updated)?;
        self.kv
            .atomic(
                AtomicWrite::new()
                    .check_value(key.clone(), current.raw.clone())
                    .set(key, value),
            )
            .await
    }

    /// Moves `current` to the id of `renamed` in one step.
    ///
    /// Fails with `Ok(false)` if the old record changed or the new id is
    /// already taken; nothing is written in that case.
    pub async fn rename(&self, current: &Versioned, renamed: &Link) -> Result<bool> {
        let old_key = link_key(&current.link.id);
        let new_key = link_key(&renamed.id);
        let value = encode(renamed)?;
        self.kv
            .atomic(
                AtomicWrite::new()
                    .check_value(old_key.clone(), current.raw.clone())
                    .check_absent(new_key.clone())
                    .delete(old_key)
                    .set(new_key, value),
            )
            .await
    }

    /// Removes the record. Returns `true` if one existed.
    pub async fn delete(&self, id: &LinkId) -> Result<bool> {
        self.kv.delete(&link_key(id)).await
    }

    /// Every stored link, in key order.
    pub async fn list(&self) -> Result<Vec<Link>> {
        self.kv
            .list(&Key::new([LINKS_PREFIX]))
            .await?
            .iter()
            .map(|(_, raw)| decode(raw))
            .collect()
    }
}

fn encode(link: &Link) -> Result<Vec<u8>> {
    serde_json::to_vec(link).map_err(|e| StorageError::InvalidData(e.to_string()))
}

fn decode(raw: &[u8]) -> Result<Link> {
    serde_json::from_slice(raw).map_err(|e| StorageError::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryKv;
    use jiff::Timestamp;

    fn id(value: &str) -> LinkId {
        LinkId::new(value).unwrap()
    }

    fn link(value: &str, url: &str) -> Link {
        Link::new(id(value), url, Timestamp::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn insert_refuses_taken_id() {
        let store = LinkStore::new(MemoryKv::new());

        assert!(store.insert(&link("abc", "https://a.example")).await.unwrap());
        assert!(!store.insert(&link("abc", "https://b.example")).await.unwrap());

        let stored = store.get(&id("abc")).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://a.example");
    }

    #[tokio::test]
    async fn records_live_under_links_prefix() {
        let store = LinkStore::new(MemoryKv::new());
        store.insert(&link("abc", "https://a.example")).await.unwrap();

        let raw = store
            .kv()
            .get(&Key::new(["links", "abc"]))
            .await
            .unwrap()
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["originalUrl"], "https://a.example");
    }

    #[tokio::test]
    async fn replace_detects_concurrent_change() {
        let store = LinkStore::new(MemoryKv::new());
        store.insert(&link("abc", "https://a.example")).await.unwrap();

        let first = store.get_versioned(&id("abc")).await.unwrap().unwrap();
        let second = store.get_versioned(&id("abc")).await.unwrap().unwrap();

        let mut bumped = first.link.clone();
        bumped.record_click(Timestamp::UNIX_EPOCH);
        assert!(store.replace(&first, &bumped).await.unwrap());

        // `second` is now stale.
        assert!(!store.replace(&second, &bumped).await.unwrap());
        assert_eq!(store.get(&id("abc")).await.unwrap().unwrap().clicks, 1);
    }

    #[tokio::test]
    async fn rename_moves_record() {
        let store = LinkStore::new(MemoryKv::new());
        store.insert(&link("old", "https://a.example")).await.unwrap();

        let current = store.get_versioned(&id("old")).await.unwrap().unwrap();
        let mut renamed = current.link.clone();
        renamed.id = id("new");

        assert!(store.rename(&current, &renamed).await.unwrap());
        assert!(!store.exists(&id("old")).await.unwrap());
        assert_eq!(
            store.get(&id("new")).await.unwrap().unwrap().original_url,
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn rename_onto_taken_id_changes_nothing() {
        let store = LinkStore::new(MemoryKv::new());
        store.insert(&link("old", "https://a.example")).await.unwrap();
        store.insert(&link("new", "https://b.example")).await.unwrap();

        let current = store.get_versioned(&id("old")).await.unwrap().unwrap();
        let mut renamed = current.link.clone();
        renamed.id = id("new");

        assert!(!store.rename(&current, &renamed).await.unwrap());
        assert!(store.exists(&id("old")).await.unwrap());
        assert_eq!(
            store.get(&id("new")).await.unwrap().unwrap().original_url,
            "https://b.example"
        );
    }

    #[tokio::test]
    async fn list_rejects_corrupt_records() {
        let kv = Arc::new(MemoryKv::new());
        let store = LinkStore::from_arc(Arc::clone(&kv));
        store.insert(&link("abc", "https://a.example")).await.unwrap();
        kv.set(&Key::new(["links", "bad"]), b"not json".to_vec())
            .await
            .unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(_)));
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = LinkStore::new(MemoryKv::new());
        store.insert(&link("abc", "https://a.example")).await.unwrap();

        assert!(store.delete(&id("abc")).await.unwrap());
        assert!(!store.delete(&id("abc")).await.unwrap());
        assert_eq!(store.get(&id("abc")).await.unwrap(), None);
    }
}
