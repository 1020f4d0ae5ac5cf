//! Post creation and the optimistic-lock like counter.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::models::{NewPost, Post};
use crate::error::{AppError, Result};
use crate::store::PostStore;

/// Bounded retry for the optimistic like. An exhausted budget surfaces as a
/// retryable VersionConflict instead of looping on a hot row forever.
#[derive(Debug, Clone, Copy)]
pub struct LikeRetryPolicy {
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for LikeRetryPolicy {
    fn default() -> Self {
        LikeRetryPolicy {
            max_attempts: 3,
            base_backoff: Duration::from_millis(40),
        }
    }
}

impl LikeRetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        // doubles per attempt: base, 2*base, 4*base, ...
        self.base_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

#[derive(Clone)]
pub struct PostWriteService {
    posts: Arc<dyn PostStore>,
    retry: LikeRetryPolicy,
}

impl PostWriteService {
    pub fn new(posts: Arc<dyn PostStore>, retry: LikeRetryPolicy) -> Self {
        Self { posts, retry }
    }

    pub async fn create(&self, author_id: i64, content: String) -> Result<Post> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("post content must not be empty".into()));
        }
        self.posts.insert(NewPost::new(author_id, content)).await
    }

    /// Strategy A: read-modify-write with a version guard.
    ///
    /// Each round reads the current row, applies the pure `liked()`
    /// transform and issues the conditional update. Zero rows affected means
    /// another writer moved the version first; the read is repeated so the
    /// retry never overwrites the concurrent increment.
    pub async fn like_optimistic(&self, post_id: i64) -> Result<Post> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let post = self
                .posts
                .find_by_id(post_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

            let mut candidate = post.liked();
            if self.posts.update_with_version(&candidate).await? {
                candidate.version += 1;
                return Ok(candidate);
            }

            if attempt >= self.retry.max_attempts {
                return Err(AppError::VersionConflict {
                    post_id,
                    attempts: attempt,
                });
            }

            warn!(post_id, attempt, "optimistic like lost the version race, retrying");
            tokio::time::sleep(self.retry.backoff(attempt)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::domain::models::DailyPostCount;
    use crate::store::memory::MemoryStore;

    fn service(store: Arc<MemoryStore>, max_attempts: u32) -> PostWriteService {
        PostWriteService::new(
            store,
            LikeRetryPolicy {
                max_attempts,
                base_backoff: Duration::ZERO,
            },
        )
    }

    /// PostStore wrapper whose conditional update misses a fixed number of
    /// times before delegating, simulating writers that keep winning the
    /// version race.
    struct ContendedStore {
        inner: Arc<MemoryStore>,
        misses_left: AtomicU32,
    }

    #[async_trait]
    impl crate::store::PostStore for ContendedStore {
        async fn insert(&self, post: NewPost) -> Result<Post> {
            self.inner.insert(post).await
        }

        async fn find_by_id(&self, post_id: i64) -> Result<Option<Post>> {
            self.inner.find_by_id(post_id).await
        }

        async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Post>> {
            self.inner.find_by_ids(ids).await
        }

        async fn page_by_author(
            &self,
            author_id: i64,
            before: Option<i64>,
            limit: i64,
        ) -> Result<Vec<Post>> {
            self.inner.page_by_author(author_id, before, limit).await
        }

        async fn page_by_authors(
            &self,
            author_ids: &[i64],
            before: Option<i64>,
            limit: i64,
        ) -> Result<Vec<Post>> {
            self.inner.page_by_authors(author_ids, before, limit).await
        }

        async fn update_with_version(&self, post: &Post) -> Result<bool> {
            let left = self.misses_left.load(Ordering::SeqCst);
            if left > 0 {
                self.misses_left.store(left - 1, Ordering::SeqCst);
                return Ok(false);
            }
            self.inner.update_with_version(post).await
        }

        async fn daily_counts(
            &self,
            author_id: i64,
            first_date: NaiveDate,
            last_date: NaiveDate,
        ) -> Result<Vec<DailyPostCount>> {
            self.inner.daily_counts(author_id, first_date, last_date).await
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_content() {
        let store = Arc::new(MemoryStore::new());
        let writes = service(store, 3);
        assert!(matches!(
            writes.create(7, "   ".into()).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn like_bumps_count_and_version_together() {
        let store = Arc::new(MemoryStore::new());
        let writes = service(store.clone(), 3);
        let post = writes.create(7, "hello".into()).await.unwrap();

        let liked = writes.like_optimistic(post.id).await.unwrap();
        assert_eq!(liked.like_count, 1);
        assert_eq!(liked.version, 1);

        let stored = store.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn like_missing_post_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let writes = service(store, 3);
        assert!(matches!(
            writes.like_optimistic(404).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn one_lost_race_is_absorbed_by_the_retry_budget() {
        let inner = Arc::new(MemoryStore::new());
        let post = inner.insert(NewPost::new(7, "hot".into())).await.unwrap();
        let contended = Arc::new(ContendedStore {
            inner: inner.clone(),
            misses_left: AtomicU32::new(1),
        });

        let writes = PostWriteService::new(
            contended,
            LikeRetryPolicy { max_attempts: 3, base_backoff: Duration::ZERO },
        );

        let liked = writes.like_optimistic(post.id).await.unwrap();
        assert_eq!(liked.like_count, 1);
    }

    #[tokio::test]
    async fn exhausted_retries_surface_a_version_conflict() {
        let inner = Arc::new(MemoryStore::new());
        let post = inner.insert(NewPost::new(7, "hot".into())).await.unwrap();
        let contended = Arc::new(ContendedStore {
            inner,
            misses_left: AtomicU32::new(u32::MAX),
        });

        let writes = PostWriteService::new(
            contended,
            LikeRetryPolicy { max_attempts: 3, base_backoff: Duration::ZERO },
        );

        match writes.like_optimistic(post.id).await.unwrap_err() {
            AppError::VersionConflict { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected VersionConflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_likes_lose_no_updates() {
        let store = Arc::new(MemoryStore::new());
        let post = store.insert(NewPost::new(7, "viral".into())).await.unwrap();

        // With N concurrent writers, every failed conditional update means
        // some other writer advanced the version, so N attempts per task
        // are always enough for all N to land.
        let tasks = 8u32;
        let writes = service(store.clone(), tasks);

        let mut handles = Vec::new();
        for _ in 0..tasks {
            let writes = writes.clone();
            let post_id = post.id;
            handles.push(tokio::spawn(async move {
                writes.like_optimistic(post_id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = store.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, tasks as i64);
        assert_eq!(stored.version, tasks as i64);
    }
}
