use crate::database::{genres, title_genres, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use domain::{DomainError, Genre, GenreRepository};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = genres)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct GenreModel {
    id: i32,
    name: String,
    slug: String,
}

#[derive(Insertable)]
#[diesel(table_name = genres)]
struct NewGenreModel {
    name: String,
    slug: String,
}

impl From<GenreModel> for Genre {
    fn from(model: GenreModel) -> Self {
        Genre::with_id(model.id, model.name, model.slug)
    }
}

impl From<&Genre> for NewGenreModel {
    fn from(genre: &Genre) -> Self {
        NewGenreModel {
            name: genre.name.clone(),
            slug: genre.slug.clone(),
        }
    }
}

pub struct SqliteGenreRepository {
    pool: SqlitePool,
}

impl SqliteGenreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for SqliteGenreRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let slug = slug.to_string();
        let result = tokio::task::spawn_blocking(move || {
            genres::table
                .filter(genres::slug.eq(slug))
                .select(GenreModel::as_select())
                .first::<GenreModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_genre = NewGenreModel::from(genre);
        let slug = genre.slug.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(genres::table)
                .values(&new_genre)
                .execute(&mut conn)?;

            genres::table
                .order(genres::id.desc())
                .select(GenreModel::as_select())
                .first::<GenreModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DomainError::SlugTaken(slug)
            }
            other => DomainError::RepositoryError(other.to_string()),
        })?;

        Ok(result.into())
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let slug = slug.to_string();
        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let genre_id = genres::table
                    .filter(genres::slug.eq(&slug))
                    .select(genres::id)
                    .first::<i32>(conn)
                    .optional()?;
                if let Some(genre_id) = genre_id {
                    // Only the links go; the titles stay.
                    diesel::delete(title_genres::table.filter(title_genres::genre_id.eq(genre_id)))
                        .execute(conn)?;
                    diesel::delete(genres::table.filter(genres::id.eq(genre_id))).execute(conn)?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            genres::table
                .order(genres::id.asc())
                .select(GenreModel::as_select())
                .load::<GenreModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }
}
