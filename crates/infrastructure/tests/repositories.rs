use domain::{
    Category, CategoryRepository, Comment, CommentRepository, DomainError, Genre, GenreRepository,
    Review, ReviewRepository, Title, TitleRepository, User, UserRepository,
};
use infrastructure::{
    Database, SqliteCategoryRepository, SqliteCommentRepository, SqliteGenreRepository,
    SqliteReviewRepository, SqliteTitleRepository, SqliteUserRepository,
};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir, // keeps the database file alive
    users: SqliteUserRepository,
    categories: SqliteCategoryRepository,
    genres: SqliteGenreRepository,
    titles: SqliteTitleRepository,
    reviews: SqliteReviewRepository,
    comments: SqliteCommentRepository,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("catalogue.db");
    let database = Database::new(path.to_str().expect("utf-8 path"));
    let pool = database.get_pool().clone();
    Fixture {
        _dir: dir,
        users: SqliteUserRepository::new(pool.clone()),
        categories: SqliteCategoryRepository::new(pool.clone()),
        genres: SqliteGenreRepository::new(pool.clone()),
        titles: SqliteTitleRepository::new(pool.clone()),
        reviews: SqliteReviewRepository::new(pool.clone()),
        comments: SqliteCommentRepository::new(pool),
    }
}

async fn seed_user(fx: &Fixture, username: &str) -> User {
    fx.users
        .save(&User::new(
            username.to_string(),
            format!("{}@x.com", username),
        ))
        .await
        .unwrap()
}

async fn seed_title(fx: &Fixture, name: &str) -> Title {
    fx.titles
        .save(&Title::new(name.to_string(), 2020, None, None, vec![]))
        .await
        .unwrap()
}

#[tokio::test]
async fn users_round_trip_and_unique_constraints_hold() {
    let fx = fixture();
    let saved = seed_user(&fx, "alice").await;
    assert!(saved.id.is_some());

    let fetched = fx.users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(fetched.email, "alice@x.com");
    assert_eq!(fetched, fx.users.find_by_id(saved.id.unwrap()).await.unwrap().unwrap());

    // The storage constraint backs up the application-level check.
    let dup = fx
        .users
        .save(&User::new("alice".to_string(), "other@x.com".to_string()))
        .await;
    assert!(matches!(dup, Err(DomainError::IdentityConflict(_))));

    let mut updated = fetched.clone();
    updated.bio = "hello".to_string();
    let updated = fx.users.update(&updated).await.unwrap();
    assert_eq!(updated.bio, "hello");

    fx.users.delete(saved.id.unwrap()).await.unwrap();
    assert!(fx.users.find_by_username("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_user_removes_their_reviews_and_comments() {
    let fx = fixture();
    let alice = seed_user(&fx, "alice").await;
    let bob = seed_user(&fx, "bob").await;
    let title = seed_title(&fx, "Dune").await;
    let title_id = title.id.unwrap();

    let review = fx
        .reviews
        .save(&Review::new(
            title_id,
            alice.username.clone(),
            "great".to_string(),
            9,
        ))
        .await
        .unwrap();
    fx.comments
        .save(&Comment::new(
            review.id.unwrap(),
            bob.username.clone(),
            "agreed".to_string(),
        ))
        .await
        .unwrap();

    fx.users.delete(alice.id.unwrap()).await.unwrap();

    assert!(fx.reviews.reviews_of(title_id).await.unwrap().is_empty());
    assert!(fx
        .comments
        .comments_of(review.id.unwrap())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn category_delete_clears_title_references() {
    let fx = fixture();
    fx.categories
        .save(&Category::new("Films".to_string(), "films".to_string()))
        .await
        .unwrap();

    let dup = fx
        .categories
        .save(&Category::new("Movies".to_string(), "films".to_string()))
        .await;
    assert!(matches!(dup, Err(DomainError::SlugTaken(_))));

    let title = fx
        .titles
        .save(&Title::new(
            "Dune".to_string(),
            2021,
            None,
            Some("films".to_string()),
            vec![],
        ))
        .await
        .unwrap();
    assert_eq!(title.category.as_deref(), Some("films"));

    fx.categories.delete_by_slug("films").await.unwrap();

    let title = fx.titles.find_by_id(title.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(title.category, None);
}

#[tokio::test]
async fn genre_delete_removes_links_but_keeps_titles() {
    let fx = fixture();
    fx.genres
        .save(&Genre::new("Sci-fi".to_string(), "sci-fi".to_string()))
        .await
        .unwrap();
    let title = fx
        .titles
        .save(&Title::new(
            "Dune".to_string(),
            2021,
            None,
            None,
            vec!["sci-fi".to_string()],
        ))
        .await
        .unwrap();
    assert_eq!(title.genres, vec!["sci-fi".to_string()]);

    fx.genres.delete_by_slug("sci-fi").await.unwrap();

    let title = fx.titles.find_by_id(title.id.unwrap()).await.unwrap().unwrap();
    assert!(title.genres.is_empty());
}

#[tokio::test]
async fn title_update_replaces_genre_links() {
    let fx = fixture();
    for (name, slug) in [("Sci-fi", "sci-fi"), ("Drama", "drama")] {
        fx.genres
            .save(&Genre::new(name.to_string(), slug.to_string()))
            .await
            .unwrap();
    }
    let mut title = fx
        .titles
        .save(&Title::new(
            "Dune".to_string(),
            2021,
            None,
            None,
            vec!["sci-fi".to_string()],
        ))
        .await
        .unwrap();

    title.genres = vec!["drama".to_string()];
    title.description = Some("the spice must flow".to_string());
    let updated = fx.titles.update(&title).await.unwrap();
    assert_eq!(updated.genres, vec!["drama".to_string()]);
    assert_eq!(updated.description.as_deref(), Some("the spice must flow"));

    let all = fx.titles.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].genres, vec!["drama".to_string()]);
}

#[tokio::test]
async fn duplicate_review_is_stopped_by_the_storage_constraint() {
    let fx = fixture();
    let alice = seed_user(&fx, "alice").await;
    let title = seed_title(&fx, "Dune").await;
    let title_id = title.id.unwrap();

    fx.reviews
        .save(&Review::new(
            title_id,
            alice.username.clone(),
            "great".to_string(),
            9,
        ))
        .await
        .unwrap();

    // The repository is exercised directly, below the service's check.
    let second = fx
        .reviews
        .save(&Review::new(
            title_id,
            alice.username.clone(),
            "again".to_string(),
            7,
        ))
        .await;
    assert!(matches!(second, Err(DomainError::DuplicateReview(_))));
}

#[tokio::test]
async fn reviews_carry_author_usernames_and_cascade_to_comments() {
    let fx = fixture();
    let alice = seed_user(&fx, "alice").await;
    let bob = seed_user(&fx, "bob").await;
    let title = seed_title(&fx, "Dune").await;
    let title_id = title.id.unwrap();

    let review = fx
        .reviews
        .save(&Review::new(
            title_id,
            alice.username.clone(),
            "great".to_string(),
            9,
        ))
        .await
        .unwrap();
    assert_eq!(review.author, "alice");

    let found = fx
        .reviews
        .find_by_title_and_author(title_id, "alice")
        .await
        .unwrap();
    assert!(found.is_some());
    assert!(fx
        .reviews
        .find_by_title_and_author(title_id, "bob")
        .await
        .unwrap()
        .is_none());

    let comment = fx
        .comments
        .save(&Comment::new(
            review.id.unwrap(),
            bob.username.clone(),
            "agreed".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(comment.author, "bob");

    fx.reviews.delete(review.id.unwrap()).await.unwrap();
    assert!(fx
        .comments
        .find_by_id(comment.id.unwrap())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn deleting_a_title_cascades_to_reviews_and_comments() {
    let fx = fixture();
    let alice = seed_user(&fx, "alice").await;
    let title = seed_title(&fx, "Dune").await;
    let title_id = title.id.unwrap();

    let review = fx
        .reviews
        .save(&Review::new(
            title_id,
            alice.username.clone(),
            "great".to_string(),
            9,
        ))
        .await
        .unwrap();
    fx.comments
        .save(&Comment::new(
            review.id.unwrap(),
            alice.username.clone(),
            "ps".to_string(),
        ))
        .await
        .unwrap();

    fx.titles.delete(title_id).await.unwrap();

    assert!(fx.titles.find_by_id(title_id).await.unwrap().is_none());
    assert!(fx
        .reviews
        .find_by_id(review.id.unwrap())
        .await
        .unwrap()
        .is_none());
    assert!(fx
        .comments
        .comments_of(review.id.unwrap())
        .await
        .unwrap()
        .is_empty());
}
