use crate::database::{categories, titles, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use domain::{Category, CategoryRepository, DomainError};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct CategoryModel {
    id: i32,
    name: String,
    slug: String,
}

#[derive(Insertable)]
#[diesel(table_name = categories)]
struct NewCategoryModel {
    name: String,
    slug: String,
}

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category::with_id(model.id, model.name, model.slug)
    }
}

impl From<&Category> for NewCategoryModel {
    fn from(category: &Category) -> Self {
        NewCategoryModel {
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let slug = slug.to_string();
        let result = tokio::task::spawn_blocking(move || {
            categories::table
                .filter(categories::slug.eq(slug))
                .select(CategoryModel::as_select())
                .first::<CategoryModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn save(&self, category: &Category) -> Result<Category, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_category = NewCategoryModel::from(category);
        let slug = category.slug.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::insert_into(categories::table)
                .values(&new_category)
                .execute(&mut conn)?;

            categories::table
                .order(categories::id.desc())
                .select(CategoryModel::as_select())
                .first::<CategoryModel>(&mut conn)
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
                let category_id = categories::table
                    .filter(categories::slug.eq(&slug))
                    .select(categories::id)
                    .first::<i32>(conn)
                    .optional()?;
                if let Some(category_id) = category_id {
                    // Titles keep living with their category cleared.
                    diesel::update(titles::table.filter(titles::category_id.eq(category_id)))
                        .set(titles::category_id.eq(None::<i32>))
                        .execute(conn)?;
                    diesel::delete(categories::table.filter(categories::id.eq(category_id)))
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            categories::table
                .order(categories::id.asc())
                .select(CategoryModel::as_select())
                .load::<CategoryModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }
}
