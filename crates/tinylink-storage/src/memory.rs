use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tinylink_core::repository::Result;
use tinylink_core::{Context, Link, LinkId, Repository, StorageError};
use tracing::trace;

#[derive(Debug, Default)]
struct Tables {
    by_id: DashMap<LinkId, String>,
    by_url: DashMap<String, LinkId>,
    last_id: AtomicU64,
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// Ids are assigned from an atomic counter starting at 1. URL uniqueness is
/// enforced per URL under the `by_url` shard lock, so concurrent inserts of the
/// same URL yield exactly one link and one `Conflict`.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Tables>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose first inserted link gets `first_id`.
    pub fn with_first_id(first_id: u64) -> Self {
        let repository = Self::new();
        repository
            .tables
            .last_id
            .store(first_id.saturating_sub(1), Ordering::SeqCst);
        repository
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.tables.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.by_id.is_empty()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn get_by_id(&self, ctx: &Context, id: LinkId) -> Result<Option<Link>> {
        ctx.check()?;
        Ok(self
            .tables
            .by_id
            .get(&id)
            .map(|url| Link::new(id, url.value().clone())))
    }

    async fn get_by_url(&self, ctx: &Context, url: &str) -> Result<Option<Link>> {
        ctx.check()?;
        Ok(self
            .tables
            .by_url
            .get(url)
            .map(|id| Link::new(*id.value(), url)))
    }

    async fn insert(&self, ctx: &Context, url: &str) -> Result<Link> {
        ctx.check()?;
        match self.tables.by_url.entry(url.to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(url.to_owned())),
            Entry::Vacant(slot) => {
                let id = LinkId::new(self.tables.last_id.fetch_add(1, Ordering::SeqCst) + 1);
                self.tables.by_id.insert(id, url.to_owned());
                slot.insert(id);
                trace!(id = %id, "Inserted link in memory");
                Ok(Link::new(id, url))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinylink_core::Interrupted;

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryRepository::new();
        let ctx = Context::background();

        let link = repo.insert(&ctx, "https://example.com/a").await.unwrap();
        assert_eq!(link.id, LinkId::new(1));

        let by_id = repo.get_by_id(&ctx, link.id).await.unwrap();
        assert_eq!(by_id, Some(link.clone()));

        let by_url = repo.get_by_url(&ctx, "https://example.com/a").await.unwrap();
        assert_eq!(by_url, Some(link));
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let repo = InMemoryRepository::new();
        let ctx = Context::background();

        let first = repo.insert(&ctx, "https://example.com/1").await.unwrap();
        let second = repo.insert(&ctx, "https://example.com/2").await.unwrap();
        let third = repo.insert(&ctx, "https://example.com/3").await.unwrap();

        assert!(first.id < second.id && second.id < third.id);
        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn first_id_is_configurable() {
        let repo = InMemoryRepository::with_first_id(61);
        let ctx = Context::background();

        let link = repo.insert(&ctx, "https://example.com/x").await.unwrap();
        assert_eq!(link.id, LinkId::new(61));
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();
        let ctx = Context::background();

        assert!(repo.get_by_id(&ctx, LinkId::new(9)).await.unwrap().is_none());
        assert!(repo
            .get_by_url(&ctx, "https://nowhere.example")
            .await
            .unwrap()
            .is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn duplicate_url_conflicts() {
        let repo = InMemoryRepository::new();
        let ctx = Context::background();

        repo.insert(&ctx, "https://example.com/a").await.unwrap();
        let err = repo.insert(&ctx, "https://example.com/a").await.unwrap_err();

        assert!(matches!(err, StorageError::Conflict(url) if url == "https://example.com/a"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_one_url_store_one_link() {
        let repo = InMemoryRepository::new();

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(&Context::background(), "https://example.com/race")
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_context_is_reported() {
        let repo = InMemoryRepository::new();
        let (ctx, handle) = Context::cancellable();
        handle.cancel();

        let err = repo.insert(&ctx, "https://example.com/a").await.unwrap_err();
        assert!(matches!(err, StorageError::Interrupted(Interrupted::Cancelled)));
        assert!(repo.is_empty());
    }
}
