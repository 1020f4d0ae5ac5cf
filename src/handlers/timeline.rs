use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::handlers::AppState;
use crate::services::feed::TimelineMode;

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub key: Option<i64>,
    pub size: Option<i64>,
    /// `push` (default) reads the materialized timeline; `pull` joins over
    /// the follow graph at read time.
    pub mode: Option<String>,
}

/// `GET /posts/members/{member_id}/timeline?key&size&mode=push|pull`
pub async fn timeline(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<TimelineQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let mode = match query.mode.as_deref() {
        Some(raw) => raw.parse::<TimelineMode>()?,
        None => TimelineMode::default(),
    };
    let cursor = crate::domain::cursor::CursorRequest::new(
        query.key,
        query.size.unwrap_or(state.default_page_size),
    );

    let page = state
        .feed
        .timeline(path.into_inner(), cursor, mode)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}
