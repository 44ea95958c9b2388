use crate::error::ApiError;
use crate::extract::{current_actor, require_access, require_admin};
use crate::pagination::{paginate, ListParams};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::{Action, DomainError, NewUser, ResourceKind, Role, User, UserPatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub bio: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            bio: user.bio,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// A `role` key is accepted but never applied: the stored role survives
/// every profile update.
#[derive(Debug, Deserialize)]
pub struct PatchUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[allow(dead_code)]
    pub role: Option<String>,
}

impl From<PatchUserRequest> for UserPatch {
    fn from(payload: PatchUserRequest) -> Self {
        UserPatch {
            username: payload.username,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_admin(&actor)?;

    let users = state
        .app
        .user_service
        .list_users(params.search.as_deref())
        .await?;
    let infos: Vec<UserInfo> = users.into_iter().map(Into::into).collect();
    Ok(Json(paginate(infos, params.page, params.page_size)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Create, ResourceKind::UserAccount)?;

    let user = state
        .app
        .user_service
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            role: payload.role,
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserInfo::from(user))).into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_admin(&actor)?;

    let user = state.app.user_service.get_by_username(&username).await?;
    Ok(Json(UserInfo::from(user)).into_response())
}

pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<PatchUserRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Update, ResourceKind::UserAccount)?;

    let user = state
        .app
        .user_service
        .update_profile(&username, payload.into())
        .await?;
    Ok(Json(UserInfo::from(user)).into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    require_access(&actor, Action::Delete, ResourceKind::UserAccount)?;

    state.app.user_service.delete_user(&username).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    let user = actor.user().ok_or(DomainError::Unauthenticated)?;
    Ok(Json(UserInfo::from(user.clone())).into_response())
}

pub async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PatchUserRequest>,
) -> Result<Response, ApiError> {
    let actor = current_actor(&state, &headers).await?;
    let user = actor.user().ok_or(DomainError::Unauthenticated)?;

    let updated = state
        .app
        .user_service
        .update_profile(&user.username, payload.into())
        .await?;
    Ok(Json(UserInfo::from(updated)).into_response())
}
