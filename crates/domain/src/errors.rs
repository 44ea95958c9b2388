use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Username '{0}' is reserved")]
    ReservedUsername(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Identity conflict: {0}")]
    IdentityConflict(String),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("A review by '{0}' already exists for this title")]
    DuplicateReview(String),

    #[error("Score {0} is out of range (1-10)")]
    ScoreOutOfRange(i32),

    #[error("Year {0} has not happened yet")]
    FutureYear(i32),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Access denied")]
    AccessDenied,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Genre not found: {0}")]
    GenreNotFound(String),

    #[error("Title not found with id: {0}")]
    TitleNotFound(i32),

    #[error("Review not found with id: {0}")]
    ReviewNotFound(i32),

    #[error("Comment not found with id: {0}")]
    CommentNotFound(i32),

    #[error("Mail delivery failed: {0}")]
    DeliveryError(String),

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}
