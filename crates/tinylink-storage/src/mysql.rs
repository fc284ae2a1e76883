use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tinylink_core::repository::Result;
use tinylink_core::{Context, Link, LinkId, Repository, StorageError};
use tracing::debug;
use typed_builder::TypedBuilder;

/// DDL for the `links` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/links.sql");

/// Pool settings for [`MySqlRepository::connect_with`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct MySqlSettings {
    #[builder(setter(into))]
    database_url: String,
    #[builder(default = 10)]
    max_connections: u32,
    #[builder(default = Duration::from_secs(5))]
    acquire_timeout: Duration,
}

/// MySQL implementation of the repository contract.
///
/// URL uniqueness is enforced by a unique index on a stored SHA-256 of the
/// URL; lookups by URL compare both the hash and the full value.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Opens a pool with default settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(MySqlSettings::builder().database_url(database_url).build()).await
    }

    /// Opens a pool and establishes its first connection.
    pub async fn connect_with(settings: MySqlSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("links schema is in place");
        Ok(())
    }
}

fn row_to_link(row: MySqlRow) -> Result<Link> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let url: String = row.try_get("url").map_err(map_sqlx_error)?;
    Ok(Link::new(LinkId::new(id), url))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn get_by_id(&self, ctx: &Context, id: LinkId) -> Result<Option<Link>> {
        let row = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT id, url
                    FROM links
                    WHERE id = ?
                    LIMIT 1
                    "#,
                )
                .bind(id.get())
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        row.map(row_to_link).transpose()
    }

    async fn get_by_url(&self, ctx: &Context, url: &str) -> Result<Option<Link>> {
        let row = ctx
            .run(
                sqlx::query(
                    r#"
                    SELECT id, url
                    FROM links
                    WHERE url_hash = UNHEX(SHA2(?, 256))
                      AND url = ?
                    LIMIT 1
                    "#,
                )
                .bind(url)
                .bind(url)
                .fetch_optional(&self.pool),
            )
            .await?
            .map_err(map_sqlx_error)?;

        row.map(row_to_link).transpose()
    }

    async fn insert(&self, ctx: &Context, url: &str) -> Result<Link> {
        let result = ctx
            .run(
                sqlx::query(
                    r#"
                    INSERT INTO links (url, created_at)
                    VALUES (?, ?)
                    "#,
                )
                .bind(url)
                .bind(Timestamp::now().as_second())
                .execute(&self.pool),
            )
            .await?;

        match result {
            Ok(done) => Ok(Link::new(LinkId::new(done.last_insert_id()), url)),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(url.to_owned())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
