use crate::error::{Result, ShortenerError};
use crate::shortener::{ShortLink, Shortener};
use async_trait::async_trait;
use std::sync::Arc;
use tinylink_core::{
    CacheError, Context, Link, LinkCache, LinkId, Repository, ShortCode, StorageError, UrlInput,
};
use tracing::{debug, debug_span, info_span, trace, warn, Instrument, Span};

/// Creates links in a durable [`Repository`] and resolves them cache-aside
/// through a [`LinkCache`].
///
/// The repository is authoritative. The cache is advisory: read failures fall
/// back to the repository and write failures are logged and dropped. Only a
/// cancelled or expired [`Context`] aborts a resolve from the cache path.
pub struct ShortenerService<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    span: Span,
}

impl<R, C> Clone for ShortenerService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            span: self.span.clone(),
        }
    }
}

impl<R: Repository, C: LinkCache> ShortenerService<R, C> {
    pub fn new(repository: R, cache: C) -> Self {
        Self {
            repository: Arc::new(repository),
            cache: Arc::new(cache),
            span: info_span!("shortener"),
        }
    }

    /// Replaces the span every operation is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the link stored for `url`, persisting a new one if there is none.
    ///
    /// `url` is expected to be validated already. Calling this twice with the
    /// same URL yields the same id, including when two calls race: the losing
    /// insert reports a conflict and the winner's link is fetched instead.
    pub async fn create(&self, ctx: &Context, url: &str) -> Result<Link> {
        let span = debug_span!(parent: &self.span, "create");
        async move {
            if let Some(link) = self.repository.get_by_url(ctx, url).await? {
                debug!(id = %link.id, "URL already shortened");
                return Ok(link);
            }

            match self.repository.insert(ctx, url).await {
                Ok(link) => {
                    debug!(id = %link.id, "Stored new link");
                    Ok(link)
                }
                Err(StorageError::Conflict(_)) => {
                    trace!("URL stored concurrently, re-fetching");
                    self.repository.get_by_url(ctx, url).await?.ok_or_else(|| {
                        ShortenerError::Storage(StorageError::InvalidData(format!(
                            "conflicting link for '{url}' is missing"
                        )))
                    })
                }
                Err(e) => Err(e.into()),
            }
        }
        .instrument(span)
        .await
    }

    /// Returns the URL of the link with `id`.
    pub async fn resolve(&self, ctx: &Context, id: LinkId) -> Result<String> {
        let span = debug_span!(parent: &self.span, "resolve", id = %id);
        async move {
            match self.cache.get_url(ctx, id).await {
                Ok(Some(url)) => {
                    trace!("Served from cache");
                    return Ok(url);
                }
                Ok(None) => trace!("Cache miss"),
                Err(CacheError::Interrupted(interrupted)) => return Err(interrupted.into()),
                Err(e) => warn!(error = %e, "Cache read failed, falling back to store"),
            }

            let link = self
                .repository
                .get_by_id(ctx, id)
                .await?
                .ok_or(ShortenerError::NotFound(id))?;

            if let Err(e) = self.cache.set_link(ctx, &link).await {
                warn!(error = %e, "Failed to populate cache");
            }

            Ok(link.url)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl<R: Repository, C: LinkCache> Shortener for ShortenerService<R, C> {
    async fn create_short_link(&self, ctx: &Context, input: UrlInput) -> Result<ShortLink> {
        let validated = input.validate()?;
        let link = self.create(ctx, validated.url()).await?;
        Ok(ShortLink::from(link))
    }

    async fn resolve_code(&self, ctx: &Context, code: &str) -> Result<String> {
        let code = ShortCode::parse(code)?;
        self.resolve(ctx, code.id()).await
    }
}
