use chrono::Duration;
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use std::time::Duration as StdDuration;

/// Settings the application is wired with. Read once at startup and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub database_path: String,
    /// Signs session tokens and keys confirmation-code digests.
    pub secret_key: String,
    pub token_ttl_hours: i64,
    pub confirmation_max_age_hours: i64,
    pub mail_from: String,
    /// When absent, confirmation codes are written to the log instead.
    pub mail_gateway_url: Option<String>,
    pub mail_timeout_seconds: u64,
}

/// Catalogue application - wires the persistence layer into the domain
/// services and owns them for the lifetime of the process.
pub struct CatalogueApp {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub catalogue_service: CatalogueService,
    pub review_service: ReviewService,
    pub comment_service: CommentService,
}

impl CatalogueApp {
    pub fn new(settings: &AppSettings) -> Self {
        // Infrastructure layer - database setup
        let database = Database::new(&settings.database_path);
        let pool = database.get_pool().clone();

        // Create repository implementations
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let category_repository: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));
        let genre_repository: Arc<dyn GenreRepository> =
            Arc::new(SqliteGenreRepository::new(pool.clone()));
        let title_repository: Arc<dyn TitleRepository> =
            Arc::new(SqliteTitleRepository::new(pool.clone()));
        let review_repository: Arc<dyn ReviewRepository> =
            Arc::new(SqliteReviewRepository::new(pool.clone()));
        let comment_repository: Arc<dyn CommentRepository> =
            Arc::new(SqliteCommentRepository::new(pool));

        let mail_sender: Arc<dyn MailSender> = match &settings.mail_gateway_url {
            Some(url) => Arc::new(HttpMailSender::new(
                url.clone(),
                settings.mail_from.clone(),
                StdDuration::from_secs(settings.mail_timeout_seconds),
            )),
            None => Arc::new(LogMailSender),
        };

        // Domain services
        let auth_service = AuthService::new(
            user_repository.clone(),
            mail_sender,
            ConfirmationCodes::new(
                settings.secret_key.clone(),
                Duration::hours(settings.confirmation_max_age_hours),
            ),
            TokenIssuer::new(
                settings.secret_key.clone(),
                Duration::hours(settings.token_ttl_hours),
            ),
        );

        let user_service = UserService::new(user_repository);

        let catalogue_service = CatalogueService::new(
            category_repository,
            genre_repository,
            title_repository.clone(),
            review_repository.clone(),
        );

        let review_service = ReviewService::new(review_repository.clone(), title_repository.clone());

        let comment_service =
            CommentService::new(comment_repository, review_repository, title_repository);

        Self {
            auth_service,
            user_service,
            catalogue_service,
            review_service,
            comment_service,
        }
    }
}
