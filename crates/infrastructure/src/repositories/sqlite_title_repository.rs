use crate::database::{categories, comments, genres, reviews, title_genres, titles, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DomainError, Title, TitleRepository};
use std::collections::HashMap;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = titles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct TitleModel {
    id: i32,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = titles)]
struct NewTitleModel {
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = title_genres)]
struct NewTitleGenreModel {
    title_id: i32,
    genre_id: i32,
}

// The domain entity references its category and genres by slug, so a
// loaded row is completed with two lookups.
fn load_title(
    conn: &mut SqliteConnection,
    model: TitleModel,
) -> Result<Title, diesel::result::Error> {
    let category = match model.category_id {
        Some(category_id) => categories::table
            .filter(categories::id.eq(category_id))
            .select(categories::slug)
            .first::<String>(conn)
            .optional()?,
        None => None,
    };
    let genre_slugs = title_genres::table
        .inner_join(genres::table)
        .filter(title_genres::title_id.eq(model.id))
        .order(title_genres::id.asc())
        .select(genres::slug)
        .load::<String>(conn)?;

    Ok(Title::with_id(
        model.id,
        model.name,
        model.year,
        model.description,
        category,
        genre_slugs,
    ))
}

fn resolve_category(
    conn: &mut SqliteConnection,
    slug: Option<&str>,
) -> Result<Option<i32>, diesel::result::Error> {
    match slug {
        Some(slug) => categories::table
            .filter(categories::slug.eq(slug))
            .select(categories::id)
            .first::<i32>(conn)
            .map(Some),
        None => Ok(None),
    }
}

fn link_genres(
    conn: &mut SqliteConnection,
    title_id: i32,
    slugs: &[String],
) -> Result<(), diesel::result::Error> {
    for slug in slugs {
        let genre_id = genres::table
            .filter(genres::slug.eq(slug))
            .select(genres::id)
            .first::<i32>(conn)?;
        diesel::insert_into(title_genres::table)
            .values(&NewTitleGenreModel { title_id, genre_id })
            .execute(conn)?;
    }
    Ok(())
}

pub struct SqliteTitleRepository {
    pool: SqlitePool,
}

impl SqliteTitleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TitleRepository for SqliteTitleRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Title>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let model = titles::table
                .filter(titles::id.eq(id))
                .select(TitleModel::as_select())
                .first::<TitleModel>(&mut conn)
                .optional()?;
            match model {
                Some(model) => load_title(&mut conn, model).map(Some),
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(result)
    }

    async fn save(&self, title: &Title) -> Result<Title, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let title = title.clone();
        let result = tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let category_id = resolve_category(conn, title.category.as_deref())?;
                diesel::insert_into(titles::table)
                    .values(&NewTitleModel {
                        name: title.name.clone(),
                        year: title.year,
                        description: title.description.clone(),
                        category_id,
                    })
                    .execute(conn)?;

                // SQLite doesn't support RETURNING, so we insert and then fetch
                let saved = titles::table
                    .order(titles::id.desc())
                    .select(TitleModel::as_select())
                    .first::<TitleModel>(conn)?;
                link_genres(conn, saved.id, &title.genres)?;
                load_title(conn, saved)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result)
    }

    async fn update(&self, title: &Title) -> Result<Title, DomainError> {
        let title_id = title.id.ok_or_else(|| {
            DomainError::ValidationError("Title ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let title = title.clone();
        let result = tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let category_id = resolve_category(conn, title.category.as_deref())?;
                diesel::update(titles::table.filter(titles::id.eq(title_id)))
                    .set((
                        titles::name.eq(title.name.clone()),
                        titles::year.eq(title.year),
                        titles::description.eq(title.description.clone()),
                        titles::category_id.eq(category_id),
                    ))
                    .execute(conn)?;

                // Genre links are replaced wholesale.
                diesel::delete(title_genres::table.filter(title_genres::title_id.eq(title_id)))
                    .execute(conn)?;
                link_genres(conn, title_id, &title.genres)?;

                let updated = titles::table
                    .filter(titles::id.eq(title_id))
                    .select(TitleModel::as_select())
                    .first::<TitleModel>(conn)?;
                load_title(conn, updated)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            conn.transaction::<_, diesel::result::Error, _>(|conn| {
                let review_ids = reviews::table
                    .filter(reviews::title_id.eq(id))
                    .select(reviews::id);
                diesel::delete(comments::table.filter(comments::review_id.eq_any(review_ids)))
                    .execute(conn)?;
                diesel::delete(reviews::table.filter(reviews::title_id.eq(id))).execute(conn)?;
                diesel::delete(title_genres::table.filter(title_genres::title_id.eq(id)))
                    .execute(conn)?;
                diesel::delete(titles::table.filter(titles::id.eq(id))).execute(conn)?;
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Title>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let models = titles::table
                .order(titles::id.asc())
                .select(TitleModel::as_select())
                .load::<TitleModel>(&mut conn)?;

            let category_slugs: HashMap<i32, String> = categories::table
                .select((categories::id, categories::slug))
                .load::<(i32, String)>(&mut conn)?
                .into_iter()
                .collect();

            let mut genres_by_title: HashMap<i32, Vec<String>> = HashMap::new();
            let links = title_genres::table
                .inner_join(genres::table)
                .order(title_genres::id.asc())
                .select((title_genres::title_id, genres::slug))
                .load::<(i32, String)>(&mut conn)?;
            for (title_id, slug) in links {
                genres_by_title.entry(title_id).or_default().push(slug);
            }

            let titles = models
                .into_iter()
                .map(|model| {
                    let category = model
                        .category_id
                        .and_then(|id| category_slugs.get(&id).cloned());
                    let genre_slugs = genres_by_title.remove(&model.id).unwrap_or_default();
                    Title::with_id(
                        model.id,
                        model.name,
                        model.year,
                        model.description,
                        category,
                        genre_slugs,
                    )
                })
                .collect::<Vec<_>>();
            Ok::<_, diesel::result::Error>(titles)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result)
    }
}
