use crate::database::{comments, reviews, users, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use domain::{DomainError, Review, ReviewRepository};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ReviewModel {
    id: i32,
    title_id: i32,
    author_id: i32,
    text: String,
    score: i32,
    pub_date: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = reviews)]
struct NewReviewModel {
    title_id: i32,
    author_id: i32,
    text: String,
    score: i32,
    pub_date: NaiveDateTime,
}

// Rows come back joined with the author's username; the numeric id stays
// an implementation detail of this layer.
fn to_domain((model, username): (ReviewModel, String)) -> Review {
    Review::with_id(
        model.id,
        model.title_id,
        username,
        model.text,
        model.score,
        model.pub_date.and_utc(),
    )
}

fn author_id_of(conn: &mut SqliteConnection, username: &str) -> Result<i32, diesel::result::Error> {
    users::table
        .filter(users::username.eq(username))
        .select(users::id)
        .first::<i32>(conn)
}

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .inner_join(users::table)
                .filter(reviews::id.eq(id))
                .select((ReviewModel::as_select(), users::username))
                .first::<(ReviewModel, String)>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(to_domain))
    }

    async fn find_by_title_and_author(
        &self,
        title_id: i32,
        author: &str,
    ) -> Result<Option<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let author = author.to_string();
        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .inner_join(users::table)
                .filter(reviews::title_id.eq(title_id))
                .filter(users::username.eq(author))
                .select((ReviewModel::as_select(), users::username))
                .first::<(ReviewModel, String)>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(to_domain))
    }

    async fn reviews_of(&self, title_id: i32) -> Result<Vec<Review>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            reviews::table
                .inner_join(users::table)
                .filter(reviews::title_id.eq(title_id))
                .order((reviews::pub_date.asc(), reviews::id.asc()))
                .select((ReviewModel::as_select(), users::username))
                .load::<(ReviewModel, String)>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(to_domain).collect())
    }

    async fn save(&self, review: &Review) -> Result<Review, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let review = review.clone();
        let author = review.author.clone();
        let result = tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let author_id = author_id_of(conn, &review.author)?;
                diesel::insert_into(reviews::table)
                    .values(&NewReviewModel {
                        title_id: review.title_id,
                        author_id,
                        text: review.text.clone(),
                        score: review.score,
                        pub_date: review.pub_date.naive_utc(),
                    })
                    .execute(conn)?;

                // SQLite doesn't support RETURNING, so we insert and then fetch
                reviews::table
                    .inner_join(users::table)
                    .order(reviews::id.desc())
                    .select((ReviewModel::as_select(), users::username))
                    .first::<(ReviewModel, String)>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::DuplicateReview(author)
            }
            other => DomainError::RepositoryError(other.to_string()),
        })?;

        Ok(to_domain(result))
    }

    async fn update(&self, review: &Review) -> Result<Review, DomainError> {
        let review_id = review.id.ok_or_else(|| {
            DomainError::ValidationError("Review ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let text = review.text.clone();
        let score = review.score;
        let result = tokio::task::spawn_blocking(move || {
            diesel::update(reviews::table.filter(reviews::id.eq(review_id)))
                .set((reviews::text.eq(text), reviews::score.eq(score)))
                .execute(&mut conn)?;

            reviews::table
                .inner_join(users::table)
                .filter(reviews::id.eq(review_id))
                .select((ReviewModel::as_select(), users::username))
                .first::<(ReviewModel, String)>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(to_domain(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(comments::table.filter(comments::review_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(reviews::table.filter(reviews::id.eq(id))).execute(conn)?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }
}
