//! HTTP surface.

pub mod posts;
pub mod timeline;

use actix_web::{web, HttpResponse};

use crate::services::{FeedService, PostLikeService, PostReadService, PostWriteService};

/// Shared handler state. Services are cheap to clone; the stores behind
/// them are Arc'd.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
    pub post_read: PostReadService,
    pub post_write: PostWriteService,
    pub post_likes: PostLikeService,
    /// Applied when a cursor request omits `size`.
    pub default_page_size: i64,
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(
            web::scope("/posts")
                .route("", web::post().to(posts::create_post))
                .route("/daily-counts", web::get().to(posts::daily_counts))
                .route("/members/{member_id}/by-cursor", web::get().to(posts::posts_by_cursor))
                .route("/members/{member_id}/timeline", web::get().to(timeline::timeline))
                .route("/{post_id}", web::get().to(posts::get_post))
                .route("/{post_id}/like", web::post().to(posts::like_post))
                .route("/{post_id}/like2", web::post().to(posts::like_post_aggregated))
                .route("/{post_id}/like-count", web::get().to(posts::like_count))
                .route("/{post_id}/likes", web::get().to(posts::likes_by_cursor)),
        );
}

/// Cursor query parameters shared by every paged endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct CursorQuery {
    pub key: Option<i64>,
    pub size: Option<i64>,
}

impl CursorQuery {
    pub fn into_request(self, default_size: i64) -> crate::domain::cursor::CursorRequest {
        crate::domain::cursor::CursorRequest::new(self.key, self.size.unwrap_or(default_size))
    }
}
