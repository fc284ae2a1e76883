use std::time::Duration;

use redis::AsyncCommands;
use tinylink_cache::{LayeredCache, MokaLinkCache, RedisLinkCache};
use tinylink_core::{Context, Link, LinkCache, LinkId};
use tinylink_test_infra::redis::RedisServer;

/// Test fixture that manages a Redis container using test-infra.
struct RedisTestContainer {
    _redis: RedisServer,
    redis_url: String,
}

impl RedisTestContainer {
    async fn start() -> Self {
        let redis = RedisServer::new().await.expect("Failed to start Redis");
        let redis_url = redis.url().await.expect("Failed to get Redis url");

        Self {
            _redis: redis,
            redis_url,
        }
    }

    async fn create_connection(&self) -> redis::aio::MultiplexedConnection {
        let client =
            redis::Client::open(self.redis_url.as_str()).expect("Failed to create Redis client");
        client
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to get Redis connection")
    }
}

fn link(id: u64, url: &str) -> Link {
    Link::new(LinkId::new(id), url)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn connect_and_round_trip() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisLinkCache::connect(&fixture.redis_url).await.unwrap();
    let ctx = Context::background();

    assert!(cache.get_url(&ctx, LinkId::new(61)).await.unwrap().is_none());

    cache
        .set_link(&ctx, &link(61, "https://example.com/some/long/path?x=1"))
        .await
        .unwrap();

    let url = cache.get_url(&ctx, LinkId::new(61)).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/some/long/path?x=1"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn keys_are_decimal_ids_under_prefix() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisLinkCache::new(fixture.create_connection().await);
    let ctx = Context::background();

    cache
        .set_link(&ctx, &link(12345, "https://example.com/raw"))
        .await
        .unwrap();

    let mut raw = fixture.create_connection().await;
    let stored: Option<String> = raw.get("tl:link:12345").await.unwrap();
    assert_eq!(stored.as_deref(), Some("https://example.com/raw"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn custom_prefix_isolates_caches() {
    let fixture = RedisTestContainer::start().await;
    let cache1 = RedisLinkCache::with_prefix(fixture.create_connection().await, "prefix1:");
    let cache2 = RedisLinkCache::with_prefix(fixture.create_connection().await, "prefix2:");
    let ctx = Context::background();

    cache1
        .set_link(&ctx, &link(1, "https://example.com/prefix"))
        .await
        .unwrap();

    assert!(cache1.get_url(&ctx, LinkId::new(1)).await.unwrap().is_some());
    assert!(cache2.get_url(&ctx, LinkId::new(1)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn ttl_expires_entries() {
    let fixture = RedisTestContainer::start().await;
    let cache =
        RedisLinkCache::new(fixture.create_connection().await).with_ttl(Duration::from_secs(1));
    let ctx = Context::background();

    cache
        .set_link(&ctx, &link(9, "https://example.com/ttl"))
        .await
        .unwrap();
    assert!(cache.get_url(&ctx, LinkId::new(9)).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(cache.get_url(&ctx, LinkId::new(9)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn sub_second_ttl_is_accepted() {
    let fixture = RedisTestContainer::start().await;
    let cache = RedisLinkCache::new(fixture.create_connection().await)
        .with_ttl(Duration::from_millis(300));
    let ctx = Context::background();

    cache
        .set_link(&ctx, &link(10, "https://example.com/short-ttl"))
        .await
        .unwrap();
    assert!(cache.get_url(&ctx, LinkId::new(10)).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(cache.get_url(&ctx, LinkId::new(10)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn layered_cache_backfills_from_redis() {
    let fixture = RedisTestContainer::start().await;
    let redis = RedisLinkCache::new(fixture.create_connection().await);
    let ctx = Context::background();

    redis
        .set_link(&ctx, &link(77, "https://example.com/shared"))
        .await
        .unwrap();

    let layered = LayeredCache::new(MokaLinkCache::new(), redis);
    let url = layered.get_url(&ctx, LinkId::new(77)).await.unwrap();
    assert_eq!(url.as_deref(), Some("https://example.com/shared"));

    let local = layered.l1().get_url(&ctx, LinkId::new(77)).await.unwrap();
    assert_eq!(local.as_deref(), Some("https://example.com/shared"));
}

#[tokio::test]
async fn connect_fails_fast_on_unreachable_server() {
    let err = RedisLinkCache::connect("redis://127.0.0.1:1").await.unwrap_err();
    assert!(matches!(err, tinylink_core::CacheError::Initialization(_)));
}
