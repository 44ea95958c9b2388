use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .app
        .auth_service
        .signup(&payload.username, &payload.email)
        .await?;
    info!("📨 Confirmation code sent for '{}'", user.username);
    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    })
    .into_response())
}

pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Response, ApiError> {
    let token = state
        .app
        .auth_service
        .issue_token(&payload.username, &payload.confirmation_code)
        .await?;
    Ok(Json(TokenResponse { token }).into_response())
}
