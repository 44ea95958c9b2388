use crate::error::ApiError;
use crate::extract::{current_actor, require_access, require_modify};
use crate::pagination::{paginate, ListParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use domain::{Action, DomainError, ResourceKind, Review};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ReviewInfo {
    pub id: i32,
    pub title: String, // the reviewed title's name
    pub text: String,
    pub author: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

fn review_info(review: Review, title_name: &str) -> ReviewInfo {
    ReviewInfo {
        id: review.id.unwrap_or(0),
        title: title_name.to_string(),
        text: review.text,
        author: review.author,
        score: review.score,
        pub_date: review.pub_date,
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Deserialize)]
pub struct PatchReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

async fn title_name(state: &AppState, title_id: i32) -> Result<String, DomainError> {
    Ok(state.app.catalogue_service.get_title(title_id).await?.title.name)
}

pub async fn list(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let name = title_name(&state, title_id).await?;
    let reviews = state.app.review_service.reviews_of(title_id).await?;
    let infos: Vec<ReviewInfo> = reviews
        .into_iter()
        .map(|review| review_info(review, &name))
        .collect();
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
) -> Result<Response, ApiError> {
    let name = title_name(&state, title_id).await?;
    let review = state
        .app
        .review_service
        .get_review(title_id, review_id)
        .await?;
    Ok(Json(review_info(review, &name)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::Review)?;
    let author = actor.user().ok_or(DomainError::Unauthenticated)?;

    let name = title_name(&state, title_id).await?;
    let review = state
        .app
        .review_service
        .create_review(title_id, author, payload.text, payload.score)
        .await?;
    Ok((StatusCode::CREATED, Json(review_info(review, &name))).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    headers: HeaderMap,
    Json(payload): Json<PatchReviewRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Update, ResourceKind::Review)?;

    let review = state
        .app
        .review_service
        .get_review(title_id, review_id)
        .await?;
    require_modify(&actor, Action::Update, &review.author)?;

    let name = title_name(&state, title_id).await?;
    let review = state
        .app
        .review_service
        .update_review(title_id, review_id, payload.text, payload.score)
        .await?;
    Ok(Json(review_info(review, &name)).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::Review)?;

    let review = state
        .app
        .review_service
        .get_review(title_id, review_id)
        .await?;
    require_modify(&actor, Action::Delete, &review.author)?;

    state
        .app
        .review_service
        .delete_review(title_id, review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
