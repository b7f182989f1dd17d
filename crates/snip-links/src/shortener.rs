use crate::error::Result;
use crate::fetch::FetchedContent;
use async_trait::async_trait;
use snip_core::{Link, LinkId};

/// Operations on stored short links.
///
/// Not-found is never an error: lookups and edits of a missing id return
/// `None`, and counting or deleting a missing id is a no-op.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores a new link to `original_url`.
    ///
    /// Uses `custom_id` when it is given and non-empty, otherwise a generated
    /// id that is retried on collision.
    async fn create_link(&self, original_url: &str, custom_id: Option<&str>) -> Result<Link>;

    async fn get_link(&self, id: &LinkId) -> Result<Option<Link>>;

    /// Counts one visit of `id`.
    async fn increment_clicks(&self, id: &LinkId) -> Result<()>;

    /// Removes `id`. Returns whether a record existed.
    async fn delete_link(&self, id: &LinkId) -> Result<bool>;

    /// Moves the link `old_id` to `new_id`, keeping every other field.
    async fn update_link_id(&self, old_id: &LinkId, new_id: &str) -> Result<Option<Link>>;

    /// Points `id` at `new_url`.
    async fn update_link_url(&self, id: &LinkId, new_url: &str) -> Result<Option<Link>>;

    /// Every link, in id order.
    async fn get_all_links(&self) -> Result<Vec<Link>>;

    /// Every link, most recently created first.
    async fn get_all_links_newest_first(&self) -> Result<Vec<Link>>;

    /// Fetches `url` on behalf of a visitor.
    async fn fetch_original_content(&self, url: &str) -> Result<FetchedContent>;
}
