use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::models::LikeRecord;
use crate::error::Result;
use crate::store::LikeStore;

/// Repository for like records (aggregation counter strategy)
#[derive(Clone)]
pub struct PostLikeRepository {
    pool: PgPool,
}

impl PostLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for PostLikeRepository {
    async fn insert_unique(&self, post_id: i64, member_id: i64) -> Result<bool> {
        // The UNIQUE (post_id, member_id) constraint absorbs repeats; a
        // second like by the same member affects zero rows.
        let result = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, member_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, member_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(member_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_for_post(&self, post_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM post_likes
            WHERE post_id = $1
            "#,
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn page_by_post(
        &self,
        post_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<LikeRecord>> {
        let likes = match before {
            Some(key) => {
                sqlx::query_as::<_, LikeRecord>(
                    r#"
                    SELECT id, post_id, member_id, created_at
                    FROM post_likes
                    WHERE post_id = $1 AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#,
                )
                .bind(post_id)
                .bind(key)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, LikeRecord>(
                    r#"
                    SELECT id, post_id, member_id, created_at
                    FROM post_likes
                    WHERE post_id = $1
                    ORDER BY id DESC
                    LIMIT $2
                    "#,
                )
                .bind(post_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(likes)
    }
}
