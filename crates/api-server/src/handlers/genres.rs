use crate::error::ApiError;
use crate::extract::{current_actor, require_access};
use crate::pagination::{paginate, ListParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{Action, Genre, ResourceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenreInfo {
    pub name: String,
    pub slug: String,
}

impl From<Genre> for GenreInfo {
    fn from(genre: Genre) -> Self {
        Self {
            name: genre.name,
            slug: genre.slug,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGenreRequest {
    pub name: String,
    pub slug: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let genres = state
        .app
        .catalogue_service
        .list_genres(params.search.as_deref())
        .await?;
    let infos: Vec<GenreInfo> = genres.into_iter().map(Into::into).collect();
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGenreRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::Genre)?;

    let genre = state
        .app
        .catalogue_service
        .create_genre(payload.name, payload.slug)
        .await?;
    Ok((StatusCode::CREATED, Json(GenreInfo::from(genre))).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::Genre)?;

    state.app.catalogue_service.delete_genre(&slug).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
