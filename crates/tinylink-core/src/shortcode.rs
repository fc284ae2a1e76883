use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;
use std::str::FromStr;

use crate::base62;
use crate::error::DecodeError;
use crate::link::LinkId;

/// A base-62 short code together with the link id it encodes.
///
/// A `ShortCode` is either produced from a [`LinkId`] or parsed from user
/// input; parsing decodes eagerly, so holding one means the id is known.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCode {
    code: SmolStr,
    id: LinkId,
}

impl ShortCode {
    /// Parses and decodes a short code received from a client.
    ///
    /// # Examples
    ///
    /// ```
    /// use tinylink_core::ShortCode;
    ///
    /// let code = ShortCode::parse("9").unwrap();
    /// assert_eq!(code.id().get(), 61);
    /// assert!(ShortCode::parse("no-dashes").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, DecodeError> {
        let id = base62::decode(code)?;
        Ok(Self {
            code: SmolStr::new(code),
            id: LinkId::new(id),
        })
    }

    /// The link id this code stands for.
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.code)
    }
}

impl From<LinkId> for ShortCode {
    fn from(id: LinkId) -> Self {
        Self {
            code: base62::encode(id.get()),
            id,
        }
    }
}

impl FromStr for ShortCode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode")
            .field(&self.code)
            .field(&self.id.get())
            .finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = SmolStr::deserialize(deserializer)?;
        Self::parse(&code).map_err(serde::de::Error::custom)
    }
}
