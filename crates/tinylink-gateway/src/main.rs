mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;

use crate::app::App;
use crate::cli::{CacheBackendArg, Cli, StorageBackendArg, MYSQL_DSN_ENV, REDIS_URL_ENV};
use crate::error::StartupError;
use crate::state::AppState;
use clap::Parser;
use std::sync::Arc;
use tinylink_cache::{LayeredCache, MokaLinkCache, MokaSettings, RedisLinkCache};
use tinylink_core::Repository;
use tinylink_shortener::{Shortener, ShortenerService};
use tinylink_storage::{InMemoryRepository, MySqlRepository};
use tracing::{info, info_span};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    tinylink_telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        public_base_url = %config.public_base_url,
        storage_backend = %config.storage,
        cache_backend = %config.cache,
        "starting tinylink gateway"
    );

    let shortener = build_shortener(&config).await?;
    let state = AppState::new(shortener, config.public_base_url.clone())
        .with_request_timeout(config.request_timeout());

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: config.listen_addr,
            source,
        })?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn build_shortener(config: &Cli) -> Result<Arc<dyn Shortener>, StartupError> {
    match config.storage {
        StorageBackendArg::InMemory => with_cache(config, InMemoryRepository::new()).await,
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .ok_or(StartupError::MissingSetting(MYSQL_DSN_ENV))?;
            let repository = MySqlRepository::connect(mysql_dsn).await?;
            repository.migrate().await?;
            with_cache(config, repository).await
        }
    }
}

async fn with_cache<R: Repository>(
    config: &Cli,
    repository: R,
) -> Result<Arc<dyn Shortener>, StartupError> {
    let span = info_span!(
        "shortener",
        storage = %config.storage,
        cache = %config.cache
    );

    let shortener: Arc<dyn Shortener> = match config.cache {
        CacheBackendArg::Moka => {
            Arc::new(ShortenerService::new(repository, moka_cache(config)).with_span(span))
        }
        CacheBackendArg::Redis => {
            let redis = redis_cache(config).await?;
            Arc::new(ShortenerService::new(repository, redis).with_span(span))
        }
        CacheBackendArg::Layered => {
            let cache = LayeredCache::new(moka_cache(config), redis_cache(config).await?);
            Arc::new(ShortenerService::new(repository, cache).with_span(span))
        }
    };

    Ok(shortener)
}

fn moka_cache(config: &Cli) -> MokaLinkCache {
    let settings = match config.cache_ttl() {
        Some(ttl) => MokaSettings::builder()
            .capacity(config.cache_capacity)
            .ttl(ttl)
            .build(),
        None => MokaSettings::builder()
            .capacity(config.cache_capacity)
            .build(),
    };
    MokaLinkCache::with_settings(settings)
}

async fn redis_cache(config: &Cli) -> Result<RedisLinkCache, StartupError> {
    let redis_url = config
        .redis_url
        .as_deref()
        .ok_or(StartupError::MissingSetting(REDIS_URL_ENV))?;
    let cache = RedisLinkCache::connect(redis_url).await?;

    Ok(match config.cache_ttl() {
        Some(ttl) => cache.with_ttl(ttl),
        None => cache,
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}
