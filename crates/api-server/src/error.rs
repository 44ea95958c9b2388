use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::DomainError;
use serde_json::json;

/// Wraps a domain error so handlers can bubble it up with `?`. Every
/// variant maps to one status and a stable machine-readable kind.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

fn status_and_kind(err: &DomainError) -> (StatusCode, &'static str) {
    match err {
        DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "bad_format"),
        DomainError::ReservedUsername(_) => (StatusCode::BAD_REQUEST, "reserved_name"),
        DomainError::UnknownRole(_) => (StatusCode::BAD_REQUEST, "unknown_role"),
        DomainError::IdentityConflict(_) => (StatusCode::BAD_REQUEST, "identity_conflict"),
        DomainError::SlugTaken(_) => (StatusCode::BAD_REQUEST, "slug_taken"),
        DomainError::DuplicateReview(_) => (StatusCode::BAD_REQUEST, "duplicate_review"),
        DomainError::ScoreOutOfRange(_) => (StatusCode::BAD_REQUEST, "score_out_of_range"),
        DomainError::FutureYear(_) => (StatusCode::BAD_REQUEST, "future_year"),
        DomainError::DeliveryError(_) => (StatusCode::BAD_REQUEST, "delivery_failed"),
        DomainError::AccessDenied => (StatusCode::BAD_REQUEST, "access_denied"),
        DomainError::Unauthenticated | DomainError::TokenError(_) => {
            (StatusCode::UNAUTHORIZED, "not_authenticated")
        }
        DomainError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "permission_denied"),
        DomainError::UserNotFound(_)
        | DomainError::CategoryNotFound(_)
        | DomainError::GenreNotFound(_)
        | DomainError::TitleNotFound(_)
        | DomainError::ReviewNotFound(_)
        | DomainError::CommentNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::RepositoryError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = status_and_kind(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self.0);
        }
        (
            status,
            Json(json!({ "kind": kind, "detail": self.0.to_string() })),
        )
            .into_response()
    }
}
