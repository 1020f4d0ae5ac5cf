use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::Result;
use crate::store::Directory;

/// Follow-graph lookups over the follows table. This service only reads
/// edges; writing them belongs to the directory side of the system.
#[derive(Clone)]
pub struct FollowRepository {
    pool: PgPool,
}

impl FollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Directory for FollowRepository {
    async fn followers_of(&self, member_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT from_member_id FROM follows
            WHERE to_member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn following_of(&self, member_id: i64) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT to_member_id FROM follows
            WHERE from_member_id = $1
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
