use crate::error::{IdConflict, LinkError, Result};
use crate::fetch::{FetchedContent, Fetcher};
use crate::shortener::Shortener;
use async_trait::async_trait;
use jiff::Timestamp;
use snip_core::{KvStore, Link, LinkId, StorageError};
use snip_generator::Generator;
use snip_storage::LinkStore;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use url::Url;

/// How many generated ids are tried before giving up on a create.
pub const MAX_GENERATE_ATTEMPTS: usize = 10;

/// How many times a read-modify-write is retried when another writer wins.
pub const MAX_CAS_ATTEMPTS: usize = 16;

/// A concrete implementation of the [`Shortener`] trait.
///
/// Every write goes through one atomic storage step:
/// - creates insert with a "must be absent" check,
/// - click counts and URL edits compare-and-swap the stored record,
/// - renames delete the old key and set the new one together.
pub struct LinkService<K, G> {
    store: LinkStore<K>,
    generator: Arc<G>,
    fetcher: Arc<dyn Fetcher>,
}

impl<K, G> Clone for LinkService<K, G> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            generator: Arc::clone(&self.generator),
            fetcher: Arc::clone(&self.fetcher),
        }
    }
}

impl<K: KvStore, G: Generator> LinkService<K, G> {
    pub fn new(kv: K, generator: G, fetcher: impl Fetcher) -> Self {
        Self::with_store(LinkStore::new(kv), generator, fetcher)
    }

    pub fn with_store(store: LinkStore<K>, generator: G, fetcher: impl Fetcher) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            fetcher: Arc::new(fetcher),
        }
    }

    pub fn store(&self) -> &LinkStore<K> {
        &self.store
    }

    /// Accepts absolute `http` and `https` URLs only.
    /// Parses `raw` and returns its serialized form, which is what gets
    /// stored. Control characters are stripped and non-ASCII is
    /// percent-encoded, so the result is always a valid `Location` value.
    fn normalize_url(raw: &str) -> Result<String> {
        let parsed = Url::parse(raw).map_err(|_| LinkError::InvalidUrl(raw.to_string()))?;

        match parsed.scheme() {
            "http" | "https" if parsed.has_host() => Ok(parsed.into()),
            _ => Err(LinkError::InvalidUrl(raw.to_string())),
        }
    }

    fn parse_id(raw: &str) -> Result<LinkId> {
        LinkId::new(raw).map_err(|_| LinkError::InvalidId(raw.to_string()))
    }

    async fn insert_custom(&self, link: Link) -> Result<Link> {
        if !self.store.insert(&link).await? {
            return Err(LinkError::DuplicateId {
                id: link.id.to_string(),
                conflict: IdConflict::CustomPath,
            });
        }
        Ok(link)
    }

    async fn insert_generated(&self, original_url: &str, created_at: Timestamp) -> Result<Link> {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let id: LinkId = self.generator.generate().into();
            let link = Link::new(id, original_url, created_at);

            if self.store.insert(&link).await? {
                return Ok(link);
            }
            debug!(id = %link.id, attempt, "generated id already taken, retrying");
        }

        warn!(
            attempts = MAX_GENERATE_ATTEMPTS,
            "giving up on generating a free link id"
        );
        Err(LinkError::IdSpaceExhausted {
            attempts: MAX_GENERATE_ATTEMPTS,
        })
    }
}

#[async_trait]
impl<K: KvStore, G: Generator> Shortener for LinkService<K, G> {
    async fn create_link(&self, original_url: &str, custom_id: Option<&str>) -> Result<Link> {
        let original_url = Self::normalize_url(original_url)?;
        let created_at = Timestamp::now();

        let link = match custom_id.filter(|id| !id.is_empty()) {
            Some(raw) => {
                let id = Self::parse_id(raw)?;
                self.insert_custom(Link::new(id, original_url, created_at))
                    .await?
            }
            None => self.insert_generated(&original_url, created_at).await?,
        };

        debug!(id = %link.id, url = %link.original_url, "created link");
        Ok(link)
    }

    async fn get_link(&self, id: &LinkId) -> Result<Option<Link>> {
        Ok(self.store.get(id).await?)
    }

    async fn increment_clicks(&self, id: &LinkId) -> Result<()> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(current) = self.store.get_versioned(id).await? else {
                return Ok(());
            };

            let mut updated = current.link.clone();
            updated.record_click(Timestamp::now());

            if self.store.replace(&current, &updated).await? {
                trace!(id = %id, clicks = updated.clicks, "counted click");
                return Ok(());
            }
            trace!(id = %id, "click count raced with another writer");
        }

        Err(StorageError::Contended(id.to_string()).into())
    }

    async fn delete_link(&self, id: &LinkId) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        debug!(id = %id, removed, "deleted link");
        Ok(removed)
    }

    async fn update_link_id(&self, old_id: &LinkId, new_id: &str) -> Result<Option<Link>> {
        let new_id = Self::parse_id(new_id)?;

        for _ in 0..MAX_CAS_ATTEMPTS {
            if self.store.exists(&new_id).await? {
                return Err(LinkError::DuplicateId {
                    id: new_id.to_string(),
                    conflict: IdConflict::Rename,
                });
            }

            let Some(current) = self.store.get_versioned(old_id).await? else {
                return Ok(None);
            };

            let mut renamed = current.link.clone();
            renamed.id = new_id.clone();

            if self.store.rename(&current, &renamed).await? {
                debug!(old = %old_id, new = %new_id, "renamed link");
                return Ok(Some(renamed));
            }
            trace!(old = %old_id, new = %new_id, "rename raced with another writer");
        }

        Err(StorageError::Contended(old_id.to_string()).into())
    }

    async fn update_link_url(&self, id: &LinkId, new_url: &str) -> Result<Option<Link>> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let Some(current) = self.store.get_versioned(id).await? else {
                return Ok(None);
            };
            let normalized = Self::normalize_url(new_url)?;

            let mut updated = current.link.clone();
            updated.original_url = normalized;

            if self.store.replace(&current, &updated).await? {
                debug!(id = %id, url = %new_url, "updated link url");
                return Ok(Some(updated));
            }
            trace!(id = %id, "url update raced with another writer");
        }

        Err(StorageError::Contended(id.to_string()).into())
    }

    async fn get_all_links(&self) -> Result<Vec<Link>> {
        Ok(self.store.list().await?)
    }

    async fn get_all_links_newest_first(&self) -> Result<Vec<Link>> {
        let mut links = self.store.list().await?;
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn fetch_original_content(&self, url: &str) -> Result<FetchedContent> {
        self.fetcher.fetch(url).await.map_err(|err| {
            warn!(url = %url, error = %err, "fetching original content failed");
            LinkError::from(err)
        })
    }
}
