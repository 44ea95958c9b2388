use crate::error::ApiError;
use crate::extract::{current_actor, require_access};
use crate::pagination::{paginate, ListParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{Action, Category, ResourceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let categories = state
        .app
        .catalogue_service
        .list_categories(params.search.as_deref())
        .await?;
    let infos: Vec<CategoryInfo> = categories.into_iter().map(Into::into).collect();
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::Category)?;

    let category = state
        .app
        .catalogue_service
        .create_category(payload.name, payload.slug)
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryInfo::from(category))).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::Category)?;

    state.app.catalogue_service.delete_category(&slug).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
