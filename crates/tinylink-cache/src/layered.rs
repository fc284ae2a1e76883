use async_trait::async_trait;
use tinylink_core::cache::Result;
use tinylink_core::{Context, Link, LinkCache, LinkId};
use tracing::{debug, trace};

/// A multi-layer cache that composes two cache implementations.
///
/// L1 is typically a fast, local cache (e.g. [`MokaLinkCache`]) and L2 a
/// slower, shared cache (e.g. [`RedisLinkCache`]).
///
/// - **Get**: Try L1 first, then L2. An L2 hit is copied into L1.
/// - **Set**: Write to L2, then L1.
///
/// [`MokaLinkCache`]: crate::MokaLinkCache
/// [`RedisLinkCache`]: crate::RedisLinkCache
///
/// # Example
///
/// ```rust
/// use tinylink_cache::{LayeredCache, MokaLinkCache};
///
/// let l1 = MokaLinkCache::with_capacity(10_000);
///
/// // let l2 = RedisLinkCache::connect("redis://127.0.0.1:6379").await?;
/// // let cache = LayeredCache::new(l1, l2);
/// # let _ = l1;
/// ```
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    /// Returns a reference to the L1 cache.
    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    /// Returns a reference to the L2 cache.
    pub fn l2(&self) -> &L2 {
        &self.l2
    }

    pub fn into_inner(self) -> (L1, L2) {
        (self.l1, self.l2)
    }
}

#[async_trait]
impl<L1, L2> LinkCache for LayeredCache<L1, L2>
where
    L1: LinkCache,
    L2: LinkCache,
{
    async fn get_url(&self, ctx: &Context, id: LinkId) -> Result<Option<String>> {
        trace!(id = %id, "Fetching link from layered cache");

        if let Some(url) = self.l1.get_url(ctx, id).await? {
            debug!(id = %id, "L1 cache hit");
            return Ok(Some(url));
        }
        trace!(id = %id, "L1 cache miss, trying L2");

        match self.l2.get_url(ctx, id).await? {
            Some(url) => {
                debug!(id = %id, "L2 cache hit, backfilling L1");
                self.l1.set_link(ctx, &Link::new(id, url.clone())).await?;
                Ok(Some(url))
            }
            None => {
                trace!(id = %id, "L2 cache miss");
                Ok(None)
            }
        }
    }

    async fn set_link(&self, ctx: &Context, link: &Link) -> Result<()> {
        trace!(id = %link.id, "Storing link in layered cache");

        // L2 first: a failed shared write leaves L1 untouched.
        self.l2.set_link(ctx, link).await?;
        self.l1.set_link(ctx, link).await?;
        debug!(id = %link.id, "Stored in both cache layers");

        Ok(())
    }
}
