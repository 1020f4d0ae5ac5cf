//! Aggregation-strategy like counter.
//!
//! Likes are insert-only rows; the count is an aggregate computed at read
//! time. No row of `posts` is touched, so concurrent likes never contend -
//! the cost moves to the read path, which is the documented trade-off.

use std::sync::Arc;

use crate::domain::cursor::{CursorRequest, CursorResponse};
use crate::domain::models::LikeRecord;
use crate::error::{AppError, Result};
use crate::store::{LikeStore, PostStore};

#[derive(Clone)]
pub struct PostLikeService {
    likes: Arc<dyn LikeStore>,
    posts: Arc<dyn PostStore>,
}

impl PostLikeService {
    pub fn new(likes: Arc<dyn LikeStore>, posts: Arc<dyn PostStore>) -> Self {
        Self { likes, posts }
    }

    /// Records a like for the member. Idempotent: a repeat of the same
    /// (post, member) pair is absorbed by the uniqueness constraint and
    /// reported as `false`, never counted twice.
    pub async fn like(&self, post_id: i64, member_id: i64) -> Result<bool> {
        self.ensure_post_exists(post_id).await?;
        self.likes.insert_unique(post_id, member_id).await
    }

    /// Read-time aggregate count for the post.
    pub async fn count(&self, post_id: i64) -> Result<i64> {
        self.ensure_post_exists(post_id).await?;
        self.likes.count_for_post(post_id).await
    }

    /// Who liked the post, newest like first, cursor-paged by like-record id.
    pub async fn likes_of(
        &self,
        post_id: i64,
        cursor: CursorRequest,
    ) -> Result<CursorResponse<LikeRecord>> {
        cursor.validate()?;
        self.ensure_post_exists(post_id).await?;
        let likes = self
            .likes
            .page_by_post(post_id, cursor.key, cursor.size)
            .await?;
        Ok(CursorResponse::of(cursor, likes, |l| l.id))
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<()> {
        self.posts
            .find_by_id(post_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
    }
}
