use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::Result;
use crate::handlers::{AppState, CursorQuery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_id: i64,
    pub content: String,
}

/// `POST /posts` - create a post and fan it out to follower timelines.
pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let post_id = state.feed.create_post(req.author_id, req.content).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "id": post_id })))
}

/// `GET /posts/{post_id}`
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = state.post_read.post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// `GET /posts/members/{member_id}/by-cursor` - a member's own posts,
/// keyset-paged newest first.
pub async fn posts_by_cursor(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CursorQuery>,
) -> Result<HttpResponse> {
    let cursor = query.into_inner().into_request(state.default_page_size);
    let page = state.post_read.posts_of(path.into_inner(), cursor).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCountsQuery {
    pub member_id: i64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// `GET /posts/daily-counts` - posts per day for one author over an
/// inclusive date range.
pub async fn daily_counts(
    state: web::Data<AppState>,
    query: web::Query<DailyCountsQuery>,
) -> Result<HttpResponse> {
    let q = query.into_inner();
    let counts = state
        .post_read
        .daily_counts(q.member_id, q.first_date, q.last_date)
        .await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// `POST /posts/{post_id}/like` - optimistic-lock increment against the
/// post row. 409 once the retry budget is spent.
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = state.post_write.like_optimistic(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": post.id,
        "likeCount": post.like_count,
        "version": post.version,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    pub member_id: i64,
}

/// `POST /posts/{post_id}/like2?memberId=` - aggregation-table like.
/// Idempotent per (post, member); `liked` is false on a repeat.
pub async fn like_post_aggregated(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    let liked = state
        .post_likes
        .like(path.into_inner(), query.member_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "liked": liked })))
}

/// `GET /posts/{post_id}/like-count` - aggregate count for the post.
pub async fn like_count(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let post_id = path.into_inner();
    let count = state.post_likes.count(post_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "postId": post_id,
        "likeCount": count,
    })))
}

/// `GET /posts/{post_id}/likes` - who liked the post, cursor-paged.
pub async fn likes_by_cursor(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<CursorQuery>,
) -> Result<HttpResponse> {
    let cursor = query.into_inner().into_request(state.default_page_size);
    let page = state.post_likes.likes_of(path.into_inner(), cursor).await?;
    Ok(HttpResponse::Ok().json(page))
}
