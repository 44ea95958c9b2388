use crate::database::{comments, users, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{Comment, CommentRepository, DomainError};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct CommentModel {
    id: i32,
    review_id: i32,
    author_id: i32,
    text: String,
    pub_date: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct NewCommentModel {
    review_id: i32,
    author_id: i32,
    text: String,
    pub_date: NaiveDateTime,
}

fn to_domain((model, username): (CommentModel, String)) -> Comment {
    Comment::with_id(
        model.id,
        model.review_id,
        username,
        model.text,
        model.pub_date.and_utc(),
    )
}

pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            comments::table
                .inner_join(users::table)
                .filter(comments::id.eq(id))
                .select((CommentModel::as_select(), users::username))
                .first::<(CommentModel, String)>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(to_domain))
    }

    async fn comments_of(&self, review_id: i32) -> Result<Vec<Comment>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            comments::table
                .inner_join(users::table)
                .filter(comments::review_id.eq(review_id))
                .order((comments::pub_date.asc(), comments::id.asc()))
                .select((CommentModel::as_select(), users::username))
                .load::<(CommentModel, String)>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(to_domain).collect())
    }

    async fn save(&self, comment: &Comment) -> Result<Comment, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let comment = comment.clone();
        let result = tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let author_id = users::table
                    .filter(users::username.eq(&comment.author))
                    .select(users::id)
                    .first::<i32>(conn)?;
                diesel::insert_into(comments::table)
                    .values(&NewCommentModel {
                        review_id: comment.review_id,
                        author_id,
                        text: comment.text.clone(),
                        pub_date: comment.pub_date.naive_utc(),
                    })
                    .execute(conn)?;

                // SQLite doesn't support RETURNING, so we insert and then fetch
                comments::table
                    .inner_join(users::table)
                    .order(comments::id.desc())
                    .select((CommentModel::as_select(), users::username))
                    .first::<(CommentModel, String)>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(to_domain(result))
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, DomainError> {
        let comment_id = comment.id.ok_or_else(|| {
            DomainError::ValidationError("Comment ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let text = comment.text.clone();
        let result = tokio::task::spawn_blocking(move || {
            diesel::update(comments::table.filter(comments::id.eq(comment_id)))
                .set(comments::text.eq(text))
                .execute(&mut conn)?;

            comments::table
                .inner_join(users::table)
                .filter(comments::id.eq(comment_id))
                .select((CommentModel::as_select(), users::username))
                .first::<(CommentModel, String)>(&mut conn)
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
            diesel::delete(comments::table.filter(comments::id.eq(id))).execute(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }
}
