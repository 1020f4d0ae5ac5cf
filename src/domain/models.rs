use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Post entity. `like_count` and `version` are the only mutable fields and
/// only move together through a conditional update; everything else is fixed
/// at creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    /// Date-only copy of `created_at`, kept for daily aggregation queries.
    pub created_date: NaiveDate,
    pub like_count: i64,
    /// Optimistic-concurrency stamp, incremented by every successful update.
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Pure transform: the post as it should look after one more like.
    /// The caller issues the conditional write guarded by `self.version`.
    pub fn liked(&self) -> Post {
        Post {
            like_count: self.like_count + 1,
            ..self.clone()
        }
    }
}

/// Insert payload for a post; the store assigns the identity.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub content: String,
    pub created_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    pub fn new(author_id: i64, content: String) -> Self {
        let now = Utc::now();
        NewPost {
            author_id,
            content,
            created_date: now.date_naive(),
            created_at: now,
        }
    }
}

/// Timeline entry - one post delivered to one follower's timeline.
/// The entry id, not the post id, is the pagination cursor for timeline
/// reads. Entries are insert-only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: i64,
    pub owner_member_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a timeline entry, built by the fan-out writer.
#[derive(Debug, Clone)]
pub struct NewTimelineEntry {
    pub owner_member_id: i64,
    pub post_id: i64,
}

/// One like by one member, under a UNIQUE (post_id, member_id) constraint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub id: i64,
    pub post_id: i64,
    pub member_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Per-day post count for one author over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyPostCount {
    pub author_id: i64,
    pub created_date: NaiveDate,
    pub post_count: i64,
}
