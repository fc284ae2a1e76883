//! Admission checks for URLs submitted for shortening.
//!
//! Checks run in a fixed order and the first failure wins: length, denylist,
//! absolute-URI parse, full URL grammar, keywords, then expiry. Nothing here
//! performs I/O; the only ambient input is the clock, and
//! [`UrlInput::validate_at`] takes that explicitly.

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use regex::Regex;
use std::sync::LazyLock;
use url::{Host, Url};

use crate::error::{KeywordError, ValidationError};

pub const URL_MIN_LENGTH: usize = 15;
pub const URL_MAX_LENGTH: usize = 2048;

pub const MAX_KEYWORDS: usize = 10;
pub const KEYWORD_MIN_LENGTH: usize = 2;
pub const KEYWORD_MAX_LENGTH: usize = 25;

/// `strptime` layout of `expires_on`, always 19 characters wide.
pub const EXPIRY_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";
const EXPIRY_WIDTH: usize = "yyyy-mm-dd hh:mm:ss".len();

/// Expiry used when the client does not ask for one: 9999-01-01 00:00:00 UTC.
pub const NEVER_EXPIRES: Timestamp = Timestamp::constant(253_370_764_800, 0);

const IP: &str = r"(([0-9a-fA-F]{1,4}:){7,7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})|:((:[0-9a-fA-F]{1,4}){1,7}|:)|fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]{1,}|::(ffff(:0{1,4}){0,1}:){0,1}((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9])\.){3,3}(25[0-5]|(2[0-4]|1{0,1}[0-9]){0,1}[0-9]))";
const URL_SCHEMA: &str = r"((ftp|https?)://)";
const URL_USERNAME: &str = r"(\S+(:\S*)?@)";
const URL_PATH: &str = r"((/|\?|#)[^\s]*)";
const URL_PORT: &str = r"(:([0-9]{1,5}))";
const URL_IP: &str = r"([1-9][0-9]?|1[0-9][0-9]|2[01][0-9]|22[0-3]|24[0-9]|25[0-5])(\.([0-9]{1,2}|1[0-9][0-9]|2[0-4][0-9]|25[0-5])){2}(?:\.([0-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-5]))";
const URL_SUBDOMAIN: &str =
    r"((www\.)|([a-zA-Z0-9]+([\-_\.]?[a-zA-Z0-9])*[a-zA-Z0-9]\.[a-zA-Z0-9]+))";

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = [
        "^",
        URL_SCHEMA,
        "?",
        URL_USERNAME,
        "?",
        "((",
        URL_IP,
        r"|(\[",
        IP,
        r"\])|(([a-zA-Z0-9]([a-zA-Z0-9\-_]+)?[a-zA-Z0-9]([\-\.][a-zA-Z0-9]+)*)|(",
        URL_SUBDOMAIN,
        r"?))?(([a-zA-Z\x{00a1}-\x{ffff}0-9]+-?-?)*[a-zA-Z\x{00a1}-\x{ffff}0-9]+)(?:\.([a-zA-Z\x{00a1}-\x{ffff}]{1,}))?))\.?",
        URL_PORT,
        "?",
        URL_PATH,
        "?$",
    ]
    .concat();
    Regex::new(&pattern).expect("url grammar is a valid regex")
});

static FILTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(xxx|localhost|127\.0\.0\.1|\.local)").expect("url filter is a valid regex")
});

static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+$").expect("keyword pattern is a valid regex"));

/// A shortening request as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlInput {
    pub url: String,
    pub keywords: Vec<String>,
    /// `yyyy-mm-dd hh:mm:ss` in UTC. Empty is treated as absent.
    pub expires_on: Option<String>,
}

/// A URL that passed every check, with what validation derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: String,
    host: String,
    keywords: Vec<String>,
    expires_on: Timestamp,
}

impl ValidatedUrl {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Bare host of the URL, without port or IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Requested expiry, or [`NEVER_EXPIRES`].
    pub fn expires_on(&self) -> Timestamp {
        self.expires_on
    }
}

impl UrlInput {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expires_on(mut self, expires_on: impl Into<String>) -> Self {
        self.expires_on = Some(expires_on.into());
        self
    }

    /// Validates against the current UTC time.
    pub fn validate(self) -> Result<ValidatedUrl, ValidationError> {
        self.validate_at(Timestamp::now())
    }

    /// Validates, judging the expiry against `now`.
    pub fn validate_at(self, now: Timestamp) -> Result<ValidatedUrl, ValidationError> {
        let len = self.url.len();
        if !(URL_MIN_LENGTH..=URL_MAX_LENGTH).contains(&len) {
            return Err(ValidationError::InvalidLength);
        }

        if FILTER_RE.is_match(&self.url) {
            return Err(ValidationError::Filtered);
        }

        let parsed = Url::parse(&self.url).map_err(|_| ValidationError::Malformed)?;
        let host = bare_host(&parsed);

        if !URL_RE.is_match(&self.url) {
            return Err(ValidationError::Malformed);
        }

        validate_keywords(&self.keywords)?;

        let expires_on = match self.expires_on.as_deref() {
            None | Some("") => NEVER_EXPIRES,
            Some(raw) => parse_expiry(raw, now)?,
        };

        Ok(ValidatedUrl {
            url: self.url,
            host,
            keywords: self.keywords,
            expires_on,
        })
    }
}

fn bare_host(url: &Url) -> String {
    match url.host() {
        Some(Host::Ipv6(addr)) => addr.to_string(),
        Some(host) => host.to_string(),
        None => String::new(),
    }
}

fn validate_keywords(keywords: &[String]) -> Result<(), KeywordError> {
    if keywords.len() > MAX_KEYWORDS {
        return Err(KeywordError::TooMany);
    }

    for word in keywords {
        if !(KEYWORD_MIN_LENGTH..=KEYWORD_MAX_LENGTH).contains(&word.len()) {
            return Err(KeywordError::Length);
        }
        if !KEYWORD_RE.is_match(word) {
            return Err(KeywordError::Charset);
        }
    }

    Ok(())
}

fn parse_expiry(raw: &str, now: Timestamp) -> Result<Timestamp, ValidationError> {
    if raw.len() != EXPIRY_WIDTH {
        return Err(ValidationError::InvalidDate);
    }

    let expires_on = DateTime::strptime(EXPIRY_LAYOUT, raw)
        .and_then(|datetime| datetime.to_zoned(TimeZone::UTC))
        .map_err(|_| ValidationError::InvalidDate)?
        .timestamp();

    if expires_on < now {
        return Err(ValidationError::PastExpiration);
    }

    Ok(expires_on)
}
