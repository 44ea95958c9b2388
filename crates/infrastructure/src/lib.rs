pub mod database;
pub mod mail;
pub mod repositories;

pub use database::{Database, SqlitePool};
pub use mail::{HttpMailSender, LogMailSender};
pub use repositories::{
    SqliteCategoryRepository, SqliteCommentRepository, SqliteGenreRepository,
    SqliteReviewRepository, SqliteTitleRepository, SqliteUserRepository,
};
