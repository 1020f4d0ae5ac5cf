use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::domain::models::{DailyPostCount, NewPost, Post};
use crate::error::Result;
use crate::store::PostStore;

const POST_COLUMNS: &str = "id, author_id, content, created_date, like_count, version, created_at";

/// Repository for post rows
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post> {
        let row = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (author_id, content, created_date, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.author_id)
        .bind(&post.content)
        .bind(post.created_date)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Post>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id = ANY($1)
            ORDER BY id DESC
            "#
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn page_by_author(
        &self,
        author_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let posts = match before {
            Some(key) => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE author_id = $1 AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#
                ))
                .bind(author_id)
                .bind(key)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE author_id = $1
                    ORDER BY id DESC
                    LIMIT $2
                    "#
                ))
                .bind(author_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(posts)
    }

    async fn page_by_authors(
        &self,
        author_ids: &[i64],
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        if author_ids.is_empty() {
            return Ok(vec![]);
        }

        let posts = match before {
            Some(key) => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE author_id = ANY($1) AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#
                ))
                .bind(author_ids)
                .bind(key)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Post>(&format!(
                    r#"
                    SELECT {POST_COLUMNS}
                    FROM posts
                    WHERE author_id = ANY($1)
                    ORDER BY id DESC
                    LIMIT $2
                    "#
                ))
                .bind(author_ids)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(posts)
    }

    async fn update_with_version(&self, post: &Post) -> Result<bool> {
        // Conditional write: only lands while the stored version still
        // matches the one the caller read.
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET like_count = $2, version = version + 1
            WHERE id = $1 AND version = $3
            "#,
        )
        .bind(post.id)
        .bind(post.like_count)
        .bind(post.version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn daily_counts(
        &self,
        author_id: i64,
        first_date: NaiveDate,
        last_date: NaiveDate,
    ) -> Result<Vec<DailyPostCount>> {
        let counts = sqlx::query_as::<_, DailyPostCount>(
            r#"
            SELECT author_id, created_date, COUNT(id) AS post_count
            FROM posts
            WHERE author_id = $1 AND created_date BETWEEN $2 AND $3
            GROUP BY author_id, created_date
            ORDER BY created_date
            "#,
        )
        .bind(author_id)
        .bind(first_date)
        .bind(last_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
