//! Core types and contracts for the tinylink URL shortener.
//!
//! This crate holds everything the shortener needs that does no I/O of its
//! own: the [`Link`] entity, the base-62 [`ShortCode`] codec, URL
//! validation, the request [`Context`], and the [`LinkCache`] and
//! [`Repository`] contracts implemented by the adapter crates.

pub mod base62;
pub mod cache;
pub mod context;
pub mod error;
pub mod link;
pub mod repository;
pub mod shortcode;
pub mod validation;

pub use cache::LinkCache;
pub use context::{CancelHandle, Context, Interrupted};
pub use error::{CacheError, DecodeError, KeywordError, StorageError, ValidationError};
pub use link::{Link, LinkId};
pub use repository::Repository;
pub use shortcode::ShortCode;
pub use validation::{UrlInput, ValidatedUrl};
