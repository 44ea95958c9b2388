pub mod sqlite_category_repository;
pub mod sqlite_comment_repository;
pub mod sqlite_genre_repository;
pub mod sqlite_review_repository;
pub mod sqlite_title_repository;
pub mod sqlite_user_repository;

pub use sqlite_category_repository::SqliteCategoryRepository;
pub use sqlite_comment_repository::SqliteCommentRepository;
pub use sqlite_genre_repository::SqliteGenreRepository;
pub use sqlite_review_repository::SqliteReviewRepository;
pub use sqlite_title_repository::SqliteTitleRepository;
pub use sqlite_user_repository::SqliteUserRepository;
