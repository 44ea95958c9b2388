use crate::error::ApiError;
use crate::extract::{current_actor, require_access, require_modify};
use crate::pagination::{paginate, ListParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use domain::{Action, Comment, DomainError, ResourceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CommentInfo {
    pub id: i32,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
    pub review: String, // the commented review's text
}

fn comment_info(comment: Comment, review_text: &str) -> CommentInfo {
    CommentInfo {
        id: comment.id.unwrap_or(0),
        text: comment.text,
        author: comment.author,
        pub_date: comment.pub_date,
        review: review_text.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

async fn review_text(
    state: &AppState,
    title_id: i32,
    review_id: i32,
) -> Result<String, DomainError> {
    Ok(state
        .app
        .review_service
        .get_review(title_id, review_id)
        .await?
        .text)
}

pub async fn list(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let review = review_text(&state, title_id, review_id).await?;
    let comments = state
        .app
        .comment_service
        .comments_of(title_id, review_id)
        .await?;
    let infos: Vec<CommentInfo> = comments
        .into_iter()
        .map(|comment| comment_info(comment, &review))
        .collect();
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
) -> Result<Response, ApiError> {
    let review = review_text(&state, title_id, review_id).await?;
    let comment = state
        .app
        .comment_service
        .get_comment(title_id, review_id, comment_id)
        .await?;
    Ok(Json(comment_info(comment, &review)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<CommentRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::Comment)?;
    let author = actor.user().ok_or(DomainError::Unauthenticated)?;

    let review = review_text(&state, title_id, review_id).await?;
    let comment = state
        .app
        .comment_service
        .create_comment(title_id, review_id, author, payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(comment_info(comment, &review))).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<CommentRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Update, ResourceKind::Comment)?;

    let comment = state
        .app
        .comment_service
        .get_comment(title_id, review_id, comment_id)
        .await?;
    require_modify(&actor, Action::Update, &comment.author)?;

    let review = review_text(&state, title_id, review_id).await?;
    let comment = state
        .app
        .comment_service
        .update_comment(title_id, review_id, comment_id, payload.text)
        .await?;
    Ok(Json(comment_info(comment, &review)).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(i32, i32, i32)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::Comment)?;

    let comment = state
        .app
        .comment_service
        .get_comment(title_id, review_id, comment_id)
        .await?;
    require_modify(&actor, Action::Delete, &comment.author)?;

    state
        .app
        .comment_service
        .delete_comment(title_id, review_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
