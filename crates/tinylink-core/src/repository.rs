use crate::context::Context;
use crate::error::StorageError;
use crate::link::{Link, LinkId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable, authoritative home of every [`Link`].
///
/// Absence is reported as `Ok(None)`, never as an error, so callers can tell
/// a missing row from a failing back-end.
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Retrieves the link with the given id.
    async fn get_by_id(&self, ctx: &Context, id: LinkId) -> Result<Option<Link>>;

    /// Retrieves the link stored for exactly this URL.
    async fn get_by_url(&self, ctx: &Context, url: &str) -> Result<Option<Link>>;

    /// Persists `url` under a freshly assigned id.
    ///
    /// Returns `Err(Conflict)` if the store already holds this URL.
    async fn insert(&self, ctx: &Context, url: &str) -> Result<Link>;
}
