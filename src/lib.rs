//! timeline-service: the write/read core of a social feed.
//!
//! Three pieces carry the real tension here and everything else serves
//! them: fan-out delivery of a new post into follower timelines, keyset
//! pagination that stays stable while new rows land at the head, and a
//! per-post like counter kept correct under concurrent increments (either
//! optimistic versioning or an insert-only aggregation table).
//!
//! Storage and the follow graph sit behind the ports in [`store`]; the
//! Postgres implementations live in [`repository`] and an in-memory one
//! backs tests and database-less runs.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod services;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use crate::config::FeedConfig;
use crate::handlers::AppState;
use crate::services::post_write::LikeRetryPolicy;
use crate::services::{
    FanoutService, FeedService, PostLikeService, PostReadService, PostWriteService,
    TimelineReadService,
};
use crate::store::{Directory, LikeStore, PostStore, TimelineStore};

/// Wires the service stack over any set of store implementations.
pub fn build_state(
    posts: Arc<dyn PostStore>,
    timeline: Arc<dyn TimelineStore>,
    likes: Arc<dyn LikeStore>,
    directory: Arc<dyn Directory>,
    feed_config: &FeedConfig,
) -> AppState {
    let post_read = PostReadService::new(posts.clone());
    let post_write = PostWriteService::new(
        posts.clone(),
        LikeRetryPolicy {
            max_attempts: feed_config.like_max_attempts,
            base_backoff: Duration::from_millis(feed_config.like_backoff_ms),
        },
    );
    let timeline_read = TimelineReadService::new(timeline.clone());
    let fanout = FanoutService::new(timeline, feed_config.fanout_chunk_size);
    let feed = FeedService::new(
        post_read.clone(),
        post_write.clone(),
        timeline_read,
        fanout,
        directory,
    );

    AppState {
        feed,
        post_read,
        post_write,
        post_likes: PostLikeService::new(likes, posts),
        default_page_size: feed_config.default_page_size,
    }
}
