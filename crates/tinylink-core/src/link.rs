use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::shortcode::ShortCode;

/// Identifier assigned to a [`Link`] by the durable store.
///
/// Ids are handed out once and never reused; they are the input of the
/// base-62 encoding that produces a link's [`ShortCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(u64);

impl LinkId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Encodes this id as a short code.
    pub fn to_short_code(self) -> ShortCode {
        ShortCode::from(self)
    }
}

impl From<u64> for LinkId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<LinkId> for u64 {
    fn from(id: LinkId) -> Self {
        id.0
    }
}

impl Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted mapping between a store-assigned id and a validated URL.
///
/// Links are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub url: String,
}

impl Link {
    pub fn new(id: LinkId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }

    pub fn short_code(&self) -> ShortCode {
        self.id.to_short_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_displays_as_decimal() {
        assert_eq!(LinkId::new(61).to_string(), "61");
        assert_eq!(LinkId::from(u64::MAX).to_string(), u64::MAX.to_string());
    }

    #[test]
    fn link_short_code_follows_its_id() {
        let link = Link::new(LinkId::new(61), "https://example.com/some/long/path?x=1");
        assert_eq!(link.short_code().as_str(), "9");
    }
}
