//! Cursor-paged reads over posts.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::cursor::{CursorRequest, CursorResponse};
use crate::domain::models::{DailyPostCount, Post};
use crate::error::{AppError, Result};
use crate::store::PostStore;

#[derive(Clone)]
pub struct PostReadService {
    posts: Arc<dyn PostStore>,
}

impl PostReadService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    pub async fn post(&self, post_id: i64) -> Result<Post> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
    }

    /// One author's posts, newest first. A sentinel key queries `id < -1`,
    /// which matches nothing and hands the sentinel straight back, so the
    /// terminal cursor is idempotent without a special case.
    pub async fn posts_of(
        &self,
        author_id: i64,
        cursor: CursorRequest,
    ) -> Result<CursorResponse<Post>> {
        cursor.validate()?;
        let posts = self
            .posts
            .page_by_author(author_id, cursor.key, cursor.size)
            .await?;
        Ok(CursorResponse::of(cursor, posts, |p| p.id))
    }

    /// Posts authored by any member of the set - the pull-model feed scan.
    pub async fn posts_of_members(
        &self,
        author_ids: &[i64],
        cursor: CursorRequest,
    ) -> Result<CursorResponse<Post>> {
        cursor.validate()?;
        let posts = self
            .posts
            .page_by_authors(author_ids, cursor.key, cursor.size)
            .await?;
        Ok(CursorResponse::of(cursor, posts, |p| p.id))
    }

    /// Bulk lookup by id for pages whose membership was already decided
    /// elsewhere (push-model timeline).
    pub async fn posts_by_ids(&self, ids: &[i64]) -> Result<Vec<Post>> {
        self.posts.find_by_ids(ids).await
    }

    pub async fn daily_counts(
        &self,
        author_id: i64,
        first_date: NaiveDate,
        last_date: NaiveDate,
    ) -> Result<Vec<DailyPostCount>> {
        if first_date > last_date {
            return Err(AppError::Validation(format!(
                "firstDate {first_date} is after lastDate {last_date}"
            )));
        }
        self.posts.daily_counts(author_id, first_date, last_date).await
    }
}
