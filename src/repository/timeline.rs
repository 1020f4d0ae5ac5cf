use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder};

use crate::domain::models::{NewTimelineEntry, TimelineEntry};
use crate::error::Result;
use crate::store::TimelineStore;

/// Repository for timeline entries. Insert-only.
#[derive(Clone)]
pub struct TimelineRepository {
    pool: PgPool,
}

impl TimelineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimelineStore for TimelineRepository {
    async fn bulk_insert(&self, entries: &[NewTimelineEntry]) -> Result<u64> {
        if entries.is_empty() {
            return Ok(0);
        }

        // One multi-row VALUES statement, one round trip per call.
        let mut builder =
            QueryBuilder::new("INSERT INTO timeline_entries (owner_member_id, post_id) ");
        builder.push_values(entries, |mut b, entry| {
            b.push_bind(entry.owner_member_id).push_bind(entry.post_id);
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn page_by_owner(
        &self,
        owner_member_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<TimelineEntry>> {
        let entries = match before {
            Some(key) => {
                sqlx::query_as::<_, TimelineEntry>(
                    r#"
                    SELECT id, owner_member_id, post_id, created_at
                    FROM timeline_entries
                    WHERE owner_member_id = $1 AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#,
                )
                .bind(owner_member_id)
                .bind(key)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, TimelineEntry>(
                    r#"
                    SELECT id, owner_member_id, post_id, created_at
                    FROM timeline_entries
                    WHERE owner_member_id = $1
                    ORDER BY id DESC
                    LIMIT $2
                    "#,
                )
                .bind(owner_member_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(entries)
    }
}
