//! Storage and directory ports.
//!
//! The feed core only ever talks to durable storage and to the follow graph
//! through these traits. `repository` holds the Postgres implementations,
//! `memory` an in-process one for tests and database-less local runs.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::{
    DailyPostCount, LikeRecord, NewPost, NewTimelineEntry, Post, TimelineEntry,
};
use crate::error::Result;

/// Durable post rows: insert, point/bulk lookup, keyset pages and the
/// version-guarded update that backs the optimistic like counter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<Post>;

    async fn find_by_id(&self, post_id: i64) -> Result<Option<Post>>;

    /// Bulk lookup by explicit ids, newest first. Not cursor-ordered; the
    /// caller already fixed the page membership.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Post>>;

    /// Up to `limit` posts by one author, descending id, optionally strictly
    /// below `before`.
    async fn page_by_author(
        &self,
        author_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>>;

    /// Same contract over a set of authors (the pull-model feed scan).
    async fn page_by_authors(
        &self,
        author_ids: &[i64],
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>>;

    /// Conditional write: persists `post.like_count` and bumps the stored
    /// version, but only while the stored version still equals
    /// `post.version`. Returns false when another writer got there first.
    async fn update_with_version(&self, post: &Post) -> Result<bool>;

    async fn daily_counts(
        &self,
        author_id: i64,
        first_date: NaiveDate,
        last_date: NaiveDate,
    ) -> Result<Vec<DailyPostCount>>;
}

/// Insert-only timeline entries, one per (post, follower) pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimelineStore: Send + Sync {
    /// Persists all entries in one round trip. Returns the inserted count.
    async fn bulk_insert(&self, entries: &[NewTimelineEntry]) -> Result<u64>;

    /// Up to `limit` entries owned by `owner_member_id`, descending entry
    /// id, optionally strictly below `before`.
    async fn page_by_owner(
        &self,
        owner_member_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<TimelineEntry>>;
}

/// Insert-only like records with a uniqueness guarantee per (post, member).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Records the like unless the pair already exists. Returns whether a
    /// row was actually created.
    async fn insert_unique(&self, post_id: i64, member_id: i64) -> Result<bool>;

    async fn count_for_post(&self, post_id: i64) -> Result<i64>;

    /// Up to `limit` like records for a post, descending record id,
    /// optionally strictly below `before`.
    async fn page_by_post(
        &self,
        post_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<LikeRecord>>;
}

/// Follow-graph lookups. Read-only from this core's perspective; edges are
/// maintained elsewhere.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Directory: Send + Sync {
    /// Members who follow `member_id` (fan-out targets).
    async fn followers_of(&self, member_id: i64) -> Result<Vec<i64>>;

    /// Members that `member_id` follows (pull-feed sources).
    async fn following_of(&self, member_id: i64) -> Result<Vec<i64>>;
}
