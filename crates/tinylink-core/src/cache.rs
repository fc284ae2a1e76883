use crate::context::Context;
use crate::error::CacheError;
use crate::link::{Link, LinkId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A best-effort cache of link URLs keyed by [`LinkId`].
///
/// The cache is never authoritative. Callers must treat every error as a
/// miss and fall back to the [`Repository`](crate::Repository); a missing or
/// stale entry may cost a store read but never changes a result.
#[async_trait]
pub trait LinkCache: Send + Sync + 'static {
    /// Get the URL cached for `id`.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, ctx: &Context, id: LinkId) -> Result<Option<String>>;

    /// Store a link. Overwrites any existing entry for the same id.
    async fn set_link(&self, ctx: &Context, link: &Link) -> Result<()>;
}
