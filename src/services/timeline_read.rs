//! Cursor-paged reads over materialized timeline entries.

use std::sync::Arc;

use crate::domain::cursor::{CursorRequest, CursorResponse};
use crate::domain::models::TimelineEntry;
use crate::error::Result;
use crate::store::TimelineStore;

#[derive(Clone)]
pub struct TimelineReadService {
    timeline: Arc<dyn TimelineStore>,
}

impl TimelineReadService {
    pub fn new(timeline: Arc<dyn TimelineStore>) -> Self {
        Self { timeline }
    }

    /// One member's timeline entries, newest first. The cursor key is the
    /// entry id, not the post id.
    pub async fn timeline_of(
        &self,
        owner_member_id: i64,
        cursor: CursorRequest,
    ) -> Result<CursorResponse<TimelineEntry>> {
        cursor.validate()?;
        let entries = self
            .timeline
            .page_by_owner(owner_member_id, cursor.key, cursor.size)
            .await?;
        Ok(CursorResponse::of(cursor, entries, |e| e.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cursor::NONE_KEY;
    use crate::domain::models::NewTimelineEntry;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn entry_id_is_the_cursor_key() {
        let store = Arc::new(MemoryStore::new());
        // two posts delivered to member 2, one to member 3
        store
            .bulk_insert(&[
                NewTimelineEntry { owner_member_id: 2, post_id: 10 },
                NewTimelineEntry { owner_member_id: 3, post_id: 10 },
                NewTimelineEntry { owner_member_id: 2, post_id: 11 },
            ])
            .await
            .unwrap();

        let service = TimelineReadService::new(store);
        let page = service
            .timeline_of(2, CursorRequest::new(None, 10))
            .await
            .unwrap();

        assert_eq!(page.items.iter().map(|e| e.id).collect::<Vec<_>>(), [3, 1]);
        assert_eq!(page.items.iter().map(|e| e.post_id).collect::<Vec<_>>(), [11, 10]);
        assert_eq!(page.next_cursor.key, Some(1));

        let tail = service.timeline_of(2, page.next_cursor).await.unwrap();
        assert!(tail.items.is_empty());
        assert_eq!(tail.next_cursor.key, Some(NONE_KEY));
    }
}
