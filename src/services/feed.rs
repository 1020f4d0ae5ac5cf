//! Feed orchestrator: composes post writes, fan-out and the two timeline
//! read models. Holds no business rules of its own beyond flow control.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::cursor::{CursorRequest, CursorResponse};
use crate::domain::models::Post;
use crate::error::{AppError, Result};
use crate::services::{FanoutService, PostReadService, PostWriteService, TimelineReadService};
use crate::store::Directory;

/// Which read model serves a timeline request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineMode {
    /// Materialized entries written at post time (read-cheap, write-heavy).
    #[default]
    Push,
    /// Join-at-read over the follow graph (write-free, read-heavy).
    Pull,
}

impl std::str::FromStr for TimelineMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(TimelineMode::Push),
            "pull" => Ok(TimelineMode::Pull),
            other => Err(AppError::Validation(format!(
                "unknown timeline mode '{other}', expected 'push' or 'pull'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct FeedService {
    post_read: PostReadService,
    post_write: PostWriteService,
    timeline_read: TimelineReadService,
    fanout: FanoutService,
    directory: Arc<dyn Directory>,
}

impl FeedService {
    pub fn new(
        post_read: PostReadService,
        post_write: PostWriteService,
        timeline_read: TimelineReadService,
        fanout: FanoutService,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            post_read,
            post_write,
            timeline_read,
            fanout,
            directory,
        }
    }

    /// Creates the post, then delivers it to every follower's timeline.
    ///
    /// The post commit is authoritative; fan-out is best-effort. A degraded
    /// delivery is logged with its counts and never fails the request,
    /// since timeline entries can be re-derived from the follow graph while
    /// a lost post cannot.
    pub async fn create_post(&self, author_id: i64, content: String) -> Result<i64> {
        let post = self.post_write.create(author_id, content).await?;

        let followers = self.directory.followers_of(author_id).await?;
        match self.fanout.deliver(post.id, &followers).await {
            Ok(delivered) => {
                info!(post_id = post.id, author_id, delivered, "post created and fanned out");
            }
            Err(err) => {
                warn!(
                    post_id = post.id,
                    author_id,
                    error = %err,
                    "fan-out degraded; post remains committed, entries await reconciliation"
                );
            }
        }

        Ok(post.id)
    }

    /// A member's home timeline under the chosen read model. Both models
    /// speak the same cursor contract to the client.
    pub async fn timeline(
        &self,
        member_id: i64,
        cursor: CursorRequest,
        mode: TimelineMode,
    ) -> Result<CursorResponse<Post>> {
        match mode {
            TimelineMode::Push => self.timeline_push(member_id, cursor).await,
            TimelineMode::Pull => self.timeline_pull(member_id, cursor).await,
        }
    }

    /// Push model: the timeline entries decide page membership and carry the
    /// cursor; posts are then resolved in one bulk lookup.
    async fn timeline_push(
        &self,
        member_id: i64,
        cursor: CursorRequest,
    ) -> Result<CursorResponse<Post>> {
        let entries = self.timeline_read.timeline_of(member_id, cursor).await?;
        let post_ids: Vec<i64> = entries.items.iter().map(|e| e.post_id).collect();
        let posts = self.post_read.posts_by_ids(&post_ids).await?;
        Ok(entries.with_items(posts))
    }

    /// Pull model: no materialized state; page straight over the posts of
    /// everyone the member follows.
    async fn timeline_pull(
        &self,
        member_id: i64,
        cursor: CursorRequest,
    ) -> Result<CursorResponse<Post>> {
        let following = self.directory.following_of(member_id).await?;
        self.post_read.posts_of_members(&following, cursor).await
    }
}
