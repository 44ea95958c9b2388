use application::{AppSettings, CatalogueApp};
use axum::{
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
mod error;
mod extract;
mod handlers;
mod pagination;

use config::Config;
use handlers::{auth, categories, comments, genres, reviews, titles, users};

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<CatalogueApp>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("api_server=debug,tower_http=debug")
        .init();

    info!("🚀 Starting catalogue API server");

    // Load configuration from environment
    let config = Config::from_env();

    info!("💾 Using database: {}", config.database_path);
    info!("🌐 API server will bind to: {}:{}", config.api_host, config.api_port);

    let app = Arc::new(CatalogueApp::new(&AppSettings {
        database_path: config.database_path.clone(),
        secret_key: config.secret_key.clone(),
        token_ttl_hours: config.token_ttl_hours,
        confirmation_max_age_hours: config.confirmation_max_age_hours,
        mail_from: config.mail_from.clone(),
        mail_gateway_url: config.mail_gateway_url.clone(),
        mail_timeout_seconds: config.mail_timeout_seconds,
    }));
    let app_state = AppState { app };

    // Build our application with routes
    let router = Router::new()
        // Passwordless authentication
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/token", post(auth::token))
        // Catalogue taxonomy
        .route(
            "/api/v1/categories",
            get(categories::list).post(categories::create),
        )
        .route("/api/v1/categories/:slug", delete(categories::destroy))
        .route("/api/v1/genres", get(genres::list).post(genres::create))
        .route("/api/v1/genres/:slug", delete(genres::destroy))
        // Titles with derived ratings
        .route("/api/v1/titles", get(titles::list).post(titles::create))
        .route(
            "/api/v1/titles/:title_id",
            get(titles::retrieve)
                .patch(titles::update)
                .delete(titles::destroy),
        )
        // Reviews nested under their title
        .route(
            "/api/v1/titles/:title_id/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id",
            get(reviews::retrieve)
                .patch(reviews::update)
                .delete(reviews::destroy),
        )
        // Comments nested under their review
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/api/v1/titles/:title_id/reviews/:review_id/comments/:comment_id",
            get(comments::retrieve)
                .patch(comments::update)
                .delete(comments::destroy),
        )
        // Identity management; /users/me must come before /users/:username
        .route("/api/v1/users", get(users::list).post(users::create))
        .route("/api/v1/users/me", get(users::me).patch(users::update_me))
        .route(
            "/api/v1/users/:username",
            get(users::retrieve)
                .patch(users::update)
                .delete(users::destroy),
        )
        // Health check
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Run the server
    let bind_address = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("🌐 API server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
