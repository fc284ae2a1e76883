use std::sync::Arc;
use std::time::Duration;

use tinylink_core::Context;
use tinylink_shortener::Shortener;

use crate::cli::DEFAULT_REQUEST_TIMEOUT_MS;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: Arc<str>,
    request_timeout: Duration,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: Arc::from(public_base_url.into()),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A fresh context bounded by the request timeout.
    pub fn context(&self) -> Context {
        Context::background().with_timeout(self.request_timeout)
    }
}
