//! In-memory store.
//!
//! Implements every storage port over `BTreeMap`s behind a single `RwLock`,
//! which makes the version-guarded post update atomic. Backs the test suite
//! and database-less local runs; identities are assigned monotonically from
//! 1 exactly like the `BIGSERIAL` columns in production.

use std::collections::{BTreeMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::models::{
    DailyPostCount, LikeRecord, NewPost, NewTimelineEntry, Post, TimelineEntry,
};
use crate::error::Result;
use crate::store::{Directory, LikeStore, PostStore, TimelineStore};

#[derive(Default)]
struct Inner {
    posts: BTreeMap<i64, Post>,
    timeline: BTreeMap<i64, TimelineEntry>,
    likes: BTreeMap<i64, LikeRecord>,
    liked_pairs: HashSet<(i64, i64)>,
    follows: Vec<(i64, i64)>,
    next_post_id: i64,
    next_timeline_id: i64,
    next_like_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a follow edge, `from` follows `to`. Edges are directory data,
    /// not written by the feed core itself.
    pub fn follow(&self, from_member_id: i64, to_member_id: i64) {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let edge = (from_member_id, to_member_id);
        if !inner.follows.contains(&edge) {
            inner.follows.push(edge);
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        inner.next_post_id += 1;
        let id = inner.next_post_id;
        let row = Post {
            id,
            author_id: post.author_id,
            content: post.content,
            created_date: post.created_date,
            like_count: 0,
            version: 0,
            created_at: post.created_at,
        };
        inner.posts.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.posts.get(&post_id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Post>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut posts: Vec<Post> = ids
            .iter()
            .filter_map(|id| inner.posts.get(id).cloned())
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(posts)
    }

    async fn page_by_author(
        &self,
        author_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let upper = before.unwrap_or(i64::MAX);
        Ok(inner
            .posts
            .range(..upper)
            .rev()
            .filter(|(_, p)| p.author_id == author_id)
            .map(|(_, p)| p.clone())
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn page_by_authors(
        &self,
        author_ids: &[i64],
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let upper = before.unwrap_or(i64::MAX);
        Ok(inner
            .posts
            .range(..upper)
            .rev()
            .filter(|(_, p)| author_ids.contains(&p.author_id))
            .map(|(_, p)| p.clone())
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update_with_version(&self, post: &Post) -> Result<bool> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        match inner.posts.get_mut(&post.id) {
            Some(stored) if stored.version == post.version => {
                stored.like_count = post.like_count;
                stored.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn daily_counts(
        &self,
        author_id: i64,
        first_date: NaiveDate,
        last_date: NaiveDate,
    ) -> Result<Vec<DailyPostCount>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for post in inner.posts.values() {
            if post.author_id == author_id
                && post.created_date >= first_date
                && post.created_date <= last_date
            {
                *by_day.entry(post.created_date).or_insert(0) += 1;
            }
        }
        Ok(by_day
            .into_iter()
            .map(|(created_date, post_count)| DailyPostCount {
                author_id,
                created_date,
                post_count,
            })
            .collect())
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn bulk_insert(&self, entries: &[NewTimelineEntry]) -> Result<u64> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let now = Utc::now();
        for entry in entries {
            inner.next_timeline_id += 1;
            let id = inner.next_timeline_id;
            inner.timeline.insert(
                id,
                TimelineEntry {
                    id,
                    owner_member_id: entry.owner_member_id,
                    post_id: entry.post_id,
                    created_at: now,
                },
            );
        }
        Ok(entries.len() as u64)
    }

    async fn page_by_owner(
        &self,
        owner_member_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<TimelineEntry>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let upper = before.unwrap_or(i64::MAX);
        Ok(inner
            .timeline
            .range(..upper)
            .rev()
            .filter(|(_, e)| e.owner_member_id == owner_member_id)
            .map(|(_, e)| e.clone())
            .take(limit.max(0) as usize)
            .collect())
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn insert_unique(&self, post_id: i64, member_id: i64) -> Result<bool> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if !inner.liked_pairs.insert((post_id, member_id)) {
            return Ok(false);
        }
        inner.next_like_id += 1;
        let id = inner.next_like_id;
        inner.likes.insert(
            id,
            LikeRecord {
                id,
                post_id,
                member_id,
                created_at: Utc::now(),
            },
        );
        Ok(true)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.likes.values().filter(|l| l.post_id == post_id).count() as i64)
    }

    async fn page_by_post(
        &self,
        post_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<LikeRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let upper = before.unwrap_or(i64::MAX);
        Ok(inner
            .likes
            .range(..upper)
            .rev()
            .filter(|(_, l)| l.post_id == post_id)
            .map(|(_, l)| l.clone())
            .take(limit.max(0) as usize)
            .collect())
    }
}

#[async_trait]
impl Directory for MemoryStore {
    async fn followers_of(&self, member_id: i64) -> Result<Vec<i64>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .follows
            .iter()
            .filter(|(_, to)| *to == member_id)
            .map(|(from, _)| *from)
            .collect())
    }

    async fn following_of(&self, member_id: i64) -> Result<Vec<i64>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .follows
            .iter()
            .filter(|(from, _)| *from == member_id)
            .map(|(_, to)| *to)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let store = MemoryStore::new();
        let a = store.insert(NewPost::new(7, "a".into())).await.unwrap();
        let b = store.insert(NewPost::new(7, "b".into())).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.version, 0);
        assert_eq!(a.like_count, 0);
    }

    #[tokio::test]
    async fn versioned_update_rejects_stale_writers() {
        let store = MemoryStore::new();
        let post = store.insert(NewPost::new(7, "a".into())).await.unwrap();

        let fresh = post.liked();
        assert!(store.update_with_version(&fresh).await.unwrap());

        // same snapshot again: the stored version already moved to 1
        assert!(!store.update_with_version(&fresh).await.unwrap());

        let stored = store.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn follow_edges_are_directional() {
        let store = MemoryStore::new();
        store.follow(2, 1);
        store.follow(3, 1);
        store.follow(1, 3);

        let mut followers = store.followers_of(1).await.unwrap();
        followers.sort_unstable();
        assert_eq!(followers, vec![2, 3]);
        assert_eq!(store.following_of(1).await.unwrap(), vec![3]);
        assert!(store.followers_of(9).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_like_is_not_recorded_twice() {
        let store = MemoryStore::new();
        assert!(store.insert_unique(1, 2).await.unwrap());
        assert!(!store.insert_unique(1, 2).await.unwrap());
        assert_eq!(store.count_for_post(1).await.unwrap(), 1);
    }
}
