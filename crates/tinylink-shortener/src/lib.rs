//! The shortener orchestrator.
//!
//! [`ShortenerService`] composes a durable [`Repository`](tinylink_core::Repository)
//! with an advisory [`LinkCache`](tinylink_core::LinkCache): links are created
//! at most once per URL and resolved cache-aside, with the cache repopulated
//! on every miss.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::{Result, ShortenerError};
pub use service::ShortenerService;
pub use shortener::{ShortLink, Shortener};
