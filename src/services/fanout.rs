//! Fan-out writer: push-model delivery of a post into follower timelines.

use std::sync::Arc;

use tracing::debug;

use crate::domain::models::NewTimelineEntry;
use crate::error::{AppError, Result};
use crate::store::TimelineStore;

#[derive(Clone)]
pub struct FanoutService {
    timeline: Arc<dyn TimelineStore>,
    chunk_size: usize,
}

impl FanoutService {
    pub fn new(timeline: Arc<dyn TimelineStore>, chunk_size: usize) -> Self {
        Self {
            timeline,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Delivers one timeline entry per follower. Writes go out in chunks so
    /// a member with a huge follower set never turns into one unbounded
    /// statement. Duplicate follower ids are the directory's problem; this
    /// writer inserts whatever it is handed.
    ///
    /// On a mid-flight storage failure the already-written chunks stay; the
    /// error carries delivered/expected counts for reconciliation.
    pub async fn deliver(&self, post_id: i64, follower_ids: &[i64]) -> Result<u64> {
        let expected = follower_ids.len() as u64;
        let mut delivered = 0u64;

        for chunk in follower_ids.chunks(self.chunk_size) {
            let entries: Vec<NewTimelineEntry> = chunk
                .iter()
                .map(|&owner_member_id| NewTimelineEntry {
                    owner_member_id,
                    post_id,
                })
                .collect();

            match self.timeline.bulk_insert(&entries).await {
                Ok(count) => delivered += count,
                Err(err) => {
                    return Err(AppError::FanoutPartialFailure {
                        delivered,
                        expected,
                        reason: err.to_string(),
                    });
                }
            }
        }

        debug!(post_id, delivered, "timeline fan-out complete");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::domain::models::TimelineEntry;
    use crate::store::memory::MemoryStore;
    use crate::store::TimelineStore;

    #[tokio::test]
    async fn one_entry_per_follower() {
        let store = Arc::new(MemoryStore::new());
        let fanout = FanoutService::new(store.clone(), 500);

        let delivered = fanout.deliver(10, &[2, 3, 4]).await.unwrap();
        assert_eq!(delivered, 3);

        for member in [2, 3, 4] {
            let entries = store.page_by_owner(member, None, 10).await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].post_id, 10);
        }
        assert!(store.page_by_owner(5, None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_follower_set_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let fanout = FanoutService::new(store, 500);
        assert_eq!(fanout.deliver(10, &[]).await.unwrap(), 0);
    }

    /// Counts bulk calls and can be told to fail from call N on.
    struct CountingTimeline {
        inner: MemoryStore,
        calls: AtomicU32,
        fail_from_call: u32,
    }

    #[async_trait]
    impl TimelineStore for CountingTimeline {
        async fn bulk_insert(&self, entries: &[crate::domain::models::NewTimelineEntry]) -> Result<u64> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.fail_from_call {
                return Err(AppError::Internal("storage unavailable".into()));
            }
            self.inner.bulk_insert(entries).await
        }

        async fn page_by_owner(
            &self,
            owner_member_id: i64,
            before: Option<i64>,
            limit: i64,
        ) -> Result<Vec<TimelineEntry>> {
            self.inner.page_by_owner(owner_member_id, before, limit).await
        }
    }

    #[tokio::test]
    async fn delivery_is_chunked_by_batch_size() {
        let counting = Arc::new(CountingTimeline {
            inner: MemoryStore::new(),
            calls: AtomicU32::new(0),
            fail_from_call: u32::MAX,
        });
        let fanout = FanoutService::new(counting.clone(), 2);

        let delivered = fanout.deliver(10, &[1, 2, 3, 4, 5]).await.unwrap();
        assert_eq!(delivered, 5);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn partial_failure_reports_what_landed() {
        let counting = Arc::new(CountingTimeline {
            inner: MemoryStore::new(),
            calls: AtomicU32::new(0),
            fail_from_call: 2,
        });
        let fanout = FanoutService::new(counting, 2);

        match fanout.deliver(10, &[1, 2, 3, 4, 5]).await.unwrap_err() {
            AppError::FanoutPartialFailure {
                delivered,
                expected,
                ..
            } => {
                assert_eq!(delivered, 2);
                assert_eq!(expected, 5);
            }
            other => panic!("expected FanoutPartialFailure, got {other:?}"),
        }
    }
}
