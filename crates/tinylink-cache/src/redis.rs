use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;
use tinylink_core::cache::Result;
use tinylink_core::{CacheError, Context, Link, LinkCache, LinkId};
use tracing::{debug, trace, warn};

/// Default prefix of every key written by [`RedisLinkCache`].
pub const DEFAULT_KEY_PREFIX: &str = "tl:link:";

/// A Redis-based implementation of [`LinkCache`].
///
/// Each link is a plain string key `<prefix><decimal id>` holding the URL,
/// optionally written with an expiry.
#[derive(Debug, Clone)]
pub struct RedisLinkCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

/// `PSETEX` argument for `ttl`, never zero.
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisLinkCache {
    /// Creates a new Redis link cache.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self::with_prefix(conn, DEFAULT_KEY_PREFIX)
    }

    /// Creates a new Redis link cache with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for cache keys (e.g., "myapp:link:")
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            ttl: None,
        }
    }

    /// Writes every entry with the given expiry, at millisecond precision.
    ///
    /// A zero `ttl` keeps entries until evicted.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Opens a connection to `redis_url` and checks it with `PING`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Initialization(format!("invalid redis url: {e}")))?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Initialization(format!("failed to connect to Redis: {e}")))?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| CacheError::Initialization(format!("Redis did not answer PING: {e}")))?;
        debug!(reply = %pong, "Connected to Redis");

        Ok(Self::new(conn))
    }

    fn cache_key(&self, id: LinkId) -> String {
        format!("{}{}", self.key_prefix, id)
    }
}

#[async_trait]
impl LinkCache for RedisLinkCache {
    async fn get_url(&self, ctx: &Context, id: LinkId) -> Result<Option<String>> {
        let key = self.cache_key(id);
        trace!(id = %id, "Fetching link from Redis cache");

        let mut conn = self.conn.clone();
        match ctx.run(conn.get::<_, Option<String>>(&key)).await? {
            Ok(Some(url)) => {
                debug!(id = %id, "Cache hit in Redis");
                Ok(Some(url))
            }
            Ok(None) => {
                trace!(id = %id, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set_link(&self, ctx: &Context, link: &Link) -> Result<()> {
        let key = self.cache_key(link.id);
        trace!(id = %link.id, "Storing link in Redis cache");

        let mut conn = self.conn.clone();
        let written = match self.ttl {
            Some(ttl) => {
                ctx.run(conn.pset_ex::<_, _, ()>(&key, &link.url, expiry_millis(ttl)))
                    .await?
            }
            None => ctx.run(conn.set::<_, _, ()>(&key, &link.url)).await?,
        };

        match written {
            Ok(()) => {
                debug!(id = %link.id, "Cached link in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(id = %link.id, error = %e, "Failed to cache link in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }
}
