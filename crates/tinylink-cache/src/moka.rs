use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tinylink_core::cache::Result;
use tinylink_core::{Context, Link, LinkCache, LinkId};
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Sizing and expiry of a [`MokaLinkCache`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MokaSettings {
    /// Maximum number of entries kept before eviction.
    #[builder(default = 10_000)]
    capacity: u64,
    /// Time-to-live of each entry. `None` keeps entries until evicted.
    #[builder(default, setter(strip_option))]
    ttl: Option<Duration>,
}

/// An in-process [`LinkCache`] backed by moka.
#[derive(Debug, Clone)]
pub struct MokaLinkCache {
    cache: Cache<LinkId, String>,
}

impl MokaLinkCache {
    pub fn new() -> Self {
        Self::with_settings(MokaSettings::builder().build())
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self::with_settings(MokaSettings::builder().capacity(capacity).build())
    }

    pub fn with_settings(settings: MokaSettings) -> Self {
        let mut builder = Cache::builder().max_capacity(settings.capacity);
        if let Some(ttl) = settings.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
        }
    }
}

impl Default for MokaLinkCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkCache for MokaLinkCache {
    async fn get_url(&self, ctx: &Context, id: LinkId) -> Result<Option<String>> {
        ctx.check()?;
        match self.cache.get(&id).await {
            Some(url) => {
                debug!(id = %id, "Cache hit in moka");
                Ok(Some(url))
            }
            None => {
                trace!(id = %id, "Cache miss in moka");
                Ok(None)
            }
        }
    }

    async fn set_link(&self, ctx: &Context, link: &Link) -> Result<()> {
        ctx.check()?;
        self.cache.insert(link.id, link.url.clone()).await;
        debug!(id = %link.id, "Cached link in moka");
        Ok(())
    }
}
