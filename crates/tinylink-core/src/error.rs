use thiserror::Error;

pub use crate::context::Interrupted;

/// Errors raised while decoding a short code back into a [`LinkId`](crate::LinkId).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("short code is empty")]
    Empty,
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("short code '{0}' exceeds the id range")]
    Overflow(String),
}

/// Reasons a keyword list is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeywordError {
    #[error("keywords must not be more than 10")]
    TooMany,
    #[error("keyword must contain 2-25 characters")]
    Length,
    #[error("keyword must be alphanumeric (dash/underscore allowed)")]
    Charset,
}

/// Client-caused rejections of a shortening request. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("url is too short or too long, should be 15-2048 chars")]
    InvalidLength,
    #[error("url matches filter pattern")]
    Filtered,
    #[error("url is invalid")]
    Malformed,
    #[error(transparent)]
    Keyword(#[from] KeywordError),
    #[error("expires_on should be in 'yyyy-mm-dd hh:mm:ss' format")]
    InvalidDate,
    #[error("expires_on can not be date in past")]
    PastExpiration,
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache initialization failed: {0}")]
    Initialization(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
    #[error("cache operation interrupted: {0}")]
    Interrupted(#[from] Interrupted),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("url already stored: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
    #[error("storage operation interrupted: {0}")]
    Interrupted(#[from] Interrupted),
}
