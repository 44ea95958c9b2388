use crate::error::ApiError;
use crate::extract::{current_actor, require_access};
use crate::handlers::categories::CategoryInfo;
use crate::handlers::genres::GenreInfo;
use crate::pagination::paginate;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{Action, DomainError, ResourceKind, Title, TitleFilter, TitlePatch, TitleWithRating};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TitleListParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub name: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TitleInfo {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<GenreInfo>,
    pub category: Option<CategoryInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct PatchTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genre: Option<Vec<String>>,
}

// Slug references are expanded into full taxonomy objects for the read
// representation.
async fn title_info(state: &AppState, entry: TitleWithRating) -> Result<TitleInfo, DomainError> {
    let category = match &entry.title.category {
        Some(slug) => Some(CategoryInfo::from(
            state.app.catalogue_service.get_category(slug).await?,
        )),
        None => None,
    };
    let mut genre = Vec::with_capacity(entry.title.genres.len());
    for slug in &entry.title.genres {
        genre.push(GenreInfo::from(
            state.app.catalogue_service.get_genre(slug).await?,
        ));
    }
    Ok(TitleInfo {
        id: entry.title.id.unwrap_or(0),
        name: entry.title.name,
        year: entry.title.year,
        rating: entry.rating,
        description: entry.title.description,
        genre,
        category,
    })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TitleListParams>,
) -> Result<Response, ApiError> {
    let filter = TitleFilter {
        name: params.name,
        year: params.year,
        category: params.category,
        genre: params.genre,
    };
    let entries = state.app.catalogue_service.list_titles(&filter).await?;
    let mut infos = Vec::with_capacity(entries.len());
    for entry in entries {
        infos.push(title_info(&state, entry).await?);
    }
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
) -> Result<Response, ApiError> {
    let entry = state.app.catalogue_service.get_title(title_id).await?;
    Ok(Json(title_info(&state, entry).await?).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTitleRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::Title)?;

    let title = Title::new(
        payload.name,
        payload.year,
        payload.description,
        payload.category,
        payload.genre.unwrap_or_default(),
    );
    let entry = state.app.catalogue_service.create_title(title).await?;
    Ok((StatusCode::CREATED, Json(title_info(&state, entry).await?)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<PatchTitleRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Update, ResourceKind::Title)?;

    let patch = TitlePatch {
        name: payload.name,
        year: payload.year,
        description: payload.description,
        category: payload.category,
        genres: payload.genre,
    };
    let entry = state
        .app
        .catalogue_service
        .update_title(title_id, patch)
        .await?;
    Ok(Json(title_info(&state, entry).await?).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(title_id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::Title)?;

    state.app.catalogue_service.delete_title(title_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
