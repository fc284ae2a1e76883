use crate::error::Result;
use async_trait::async_trait;
use tinylink_core::{Context, Link, ShortCode, UrlInput};

/// A created (or reused) link together with its short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub link: Link,
    pub code: ShortCode,
}

impl From<Link> for ShortLink {
    fn from(link: Link) -> Self {
        let code = link.short_code();
        Self { link, code }
    }
}

/// The operations exposed to a transport layer.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Validates a raw URL with its optional metadata and returns the link
    /// stored for it, creating one if needed.
    async fn create_short_link(&self, ctx: &Context, input: UrlInput) -> Result<ShortLink>;

    /// Decodes a short code and returns the URL it points to.
    async fn resolve_code(&self, ctx: &Context, code: &str) -> Result<String>;
}
