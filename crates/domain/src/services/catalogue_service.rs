use crate::entities::{Category, Genre, Title};
use crate::errors::DomainError;
use crate::repositories::{CategoryRepository, GenreRepository, ReviewRepository, TitleRepository};
use std::sync::Arc;

/// List filters for titles. All are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub name: Option<String>, // substring match
    pub year: Option<i32>,    // exact match
    pub category: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TitlePatch {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub genres: Option<Vec<String>>,
}

/// Read representation of a title: the rating is derived from its
/// reviews at read time and never stored.
#[derive(Debug, Clone)]
pub struct TitleWithRating {
    pub title: Title,
    pub rating: Option<i32>,
}

/// Arithmetic mean truncated to an integer; absent when there are no
/// scores.
pub fn mean_score(scores: &[i32]) -> Option<i32> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|&s| s as i64).sum();
    Some((sum / scores.len() as i64) as i32)
}

/// Catalogue taxonomy (categories, genres) and titles.
pub struct CatalogueService {
    category_repository: Arc<dyn CategoryRepository>,
    genre_repository: Arc<dyn GenreRepository>,
    title_repository: Arc<dyn TitleRepository>,
    review_repository: Arc<dyn ReviewRepository>,
}

impl CatalogueService {
    pub fn new(
        category_repository: Arc<dyn CategoryRepository>,
        genre_repository: Arc<dyn GenreRepository>,
        title_repository: Arc<dyn TitleRepository>,
        review_repository: Arc<dyn ReviewRepository>,
    ) -> Self {
        Self {
            category_repository,
            genre_repository,
            title_repository,
            review_repository,
        }
    }

    pub async fn list_categories(&self, search: Option<&str>) -> Result<Vec<Category>, DomainError> {
        let categories = self.category_repository.find_all().await?;
        Ok(filter_by_name(categories, search, |c| &c.name))
    }

    pub async fn create_category(&self, name: String, slug: String) -> Result<Category, DomainError> {
        let category = Category::new(name, slug);
        category.validate()?;
        if self
            .category_repository
            .find_by_slug(&category.slug)
            .await?
            .is_some()
        {
            return Err(DomainError::SlugTaken(category.slug));
        }
        self.category_repository.save(&category).await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), DomainError> {
        if self.category_repository.find_by_slug(slug).await?.is_none() {
            return Err(DomainError::CategoryNotFound(slug.to_string()));
        }
        self.category_repository.delete_by_slug(slug).await
    }

    pub async fn list_genres(&self, search: Option<&str>) -> Result<Vec<Genre>, DomainError> {
        let genres = self.genre_repository.find_all().await?;
        Ok(filter_by_name(genres, search, |g| &g.name))
    }

    pub async fn create_genre(&self, name: String, slug: String) -> Result<Genre, DomainError> {
        let genre = Genre::new(name, slug);
        genre.validate()?;
        if self
            .genre_repository
            .find_by_slug(&genre.slug)
            .await?
            .is_some()
        {
            return Err(DomainError::SlugTaken(genre.slug));
        }
        self.genre_repository.save(&genre).await
    }

    pub async fn delete_genre(&self, slug: &str) -> Result<(), DomainError> {
        if self.genre_repository.find_by_slug(slug).await?.is_none() {
            return Err(DomainError::GenreNotFound(slug.to_string()));
        }
        self.genre_repository.delete_by_slug(slug).await
    }

    pub async fn list_titles(&self, filter: &TitleFilter) -> Result<Vec<TitleWithRating>, DomainError> {
        let titles = self.title_repository.find_all().await?;
        let mut out = Vec::new();
        for title in titles {
            if let Some(name) = &filter.name {
                if !title.name.to_lowercase().contains(&name.to_lowercase()) {
                    continue;
                }
            }
            if let Some(year) = filter.year {
                if title.year != year {
                    continue;
                }
            }
            if let Some(category) = &filter.category {
                if title.category.as_deref() != Some(category.as_str()) {
                    continue;
                }
            }
            if let Some(genre) = &filter.genre {
                if !title.genres.iter().any(|g| g == genre) {
                    continue;
                }
            }
            out.push(self.with_rating(title).await?);
        }
        Ok(out)
    }

    pub async fn get_title(&self, id: i32) -> Result<TitleWithRating, DomainError> {
        match self.title_repository.find_by_id(id).await? {
            Some(title) => self.with_rating(title).await,
            None => Err(DomainError::TitleNotFound(id)),
        }
    }

    pub async fn create_title(&self, title: Title) -> Result<TitleWithRating, DomainError> {
        title.validate()?;
        self.check_slug_references(&title).await?;
        let saved = self.title_repository.save(&title).await?;
        Ok(TitleWithRating {
            title: saved,
            rating: None,
        })
    }

    pub async fn update_title(&self, id: i32, patch: TitlePatch) -> Result<TitleWithRating, DomainError> {
        let mut title = match self.title_repository.find_by_id(id).await? {
            Some(title) => title,
            None => return Err(DomainError::TitleNotFound(id)),
        };
        if let Some(name) = patch.name {
            title.name = name;
        }
        if let Some(year) = patch.year {
            title.year = year;
        }
        if let Some(description) = patch.description {
            title.description = Some(description);
        }
        if let Some(category) = patch.category {
            title.category = Some(category);
        }
        if let Some(genres) = patch.genres {
            title.genres = genres;
        }
        title.validate()?;
        self.check_slug_references(&title).await?;
        let updated = self.title_repository.update(&title).await?;
        self.with_rating(updated).await
    }

    pub async fn delete_title(&self, id: i32) -> Result<(), DomainError> {
        if self.title_repository.find_by_id(id).await?.is_none() {
            return Err(DomainError::TitleNotFound(id));
        }
        self.title_repository.delete(id).await
    }

    pub async fn get_category(&self, slug: &str) -> Result<Category, DomainError> {
        match self.category_repository.find_by_slug(slug).await? {
            Some(category) => Ok(category),
            None => Err(DomainError::CategoryNotFound(slug.to_string())),
        }
    }

    pub async fn get_genre(&self, slug: &str) -> Result<Genre, DomainError> {
        match self.genre_repository.find_by_slug(slug).await? {
            Some(genre) => Ok(genre),
            None => Err(DomainError::GenreNotFound(slug.to_string())),
        }
    }

    /// Slug references on a write must resolve; a dangling one is a
    /// client error, not a missing resource.
    async fn check_slug_references(&self, title: &Title) -> Result<(), DomainError> {
        if let Some(category) = &title.category {
            if self.category_repository.find_by_slug(category).await?.is_none() {
                return Err(DomainError::ValidationError(format!(
                    "unknown category slug: {}",
                    category
                )));
            }
        }
        for genre in &title.genres {
            if self.genre_repository.find_by_slug(genre).await?.is_none() {
                return Err(DomainError::ValidationError(format!(
                    "unknown genre slug: {}",
                    genre
                )));
            }
        }
        Ok(())
    }

    async fn with_rating(&self, title: Title) -> Result<TitleWithRating, DomainError> {
        let title_id = title.id.unwrap_or(0);
        let reviews = self.review_repository.reviews_of(title_id).await?;
        let scores: Vec<i32> = reviews.iter().map(|r| r.score).collect();
        Ok(TitleWithRating {
            rating: mean_score(&scores),
            title,
        })
    }
}

fn filter_by_name<T>(items: Vec<T>, search: Option<&str>, name: impl Fn(&T) -> &str) -> Vec<T> {
    match search {
        Some(needle) => {
            let needle = needle.to_lowercase();
            items
                .into_iter()
                .filter(|item| name(item).to_lowercase().contains(&needle))
                .collect()
        }
        None => items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Review;
    use crate::repositories::ReviewRepository as _;
    use crate::test_support::{InMemoryCategories, InMemoryGenres, InMemoryReviews, InMemoryTitles};

    struct Fixture {
        reviews: Arc<InMemoryReviews>,
        service: CatalogueService,
    }

    fn fixture() -> Fixture {
        let reviews = Arc::new(InMemoryReviews::default());
        let service = CatalogueService::new(
            Arc::new(InMemoryCategories::default()),
            Arc::new(InMemoryGenres::default()),
            Arc::new(InMemoryTitles::default()),
            reviews.clone(),
        );
        Fixture { reviews, service }
    }

    #[test]
    fn mean_score_truncates_and_handles_empty() {
        assert_eq!(mean_score(&[]), None);
        assert_eq!(mean_score(&[7]), Some(7));
        assert_eq!(mean_score(&[1, 2]), Some(1));
        assert_eq!(mean_score(&[10, 10, 9]), Some(9));
    }

    #[tokio::test]
    async fn rating_is_absent_without_reviews_and_derived_with_them() {
        let fx = fixture();
        let created = fx
            .service
            .create_title(Title::new("Dune".to_string(), 2021, None, None, vec![]))
            .await
            .unwrap();
        assert_eq!(created.rating, None);
        let id = created.title.id.unwrap();

        fx.reviews
            .save(&Review::new(id, "alice".to_string(), "great".to_string(), 10))
            .await
            .unwrap();
        fx.reviews
            .save(&Review::new(id, "bob".to_string(), "okay".to_string(), 5))
            .await
            .unwrap();

        let fetched = fx.service.get_title(id).await.unwrap();
        assert_eq!(fetched.rating, Some(7));
    }

    #[tokio::test]
    async fn duplicate_slugs_are_conflicts() {
        let fx = fixture();
        fx.service
            .create_category("Films".to_string(), "films".to_string())
            .await
            .unwrap();
        assert!(matches!(
            fx.service
                .create_category("Movies".to_string(), "films".to_string())
                .await,
            Err(DomainError::SlugTaken(_))
        ));
    }

    #[tokio::test]
    async fn titles_cannot_reference_unknown_slugs() {
        let fx = fixture();
        let title = Title::new(
            "Dune".to_string(),
            2021,
            None,
            Some("films".to_string()),
            vec![],
        );
        assert!(matches!(
            fx.service.create_title(title).await,
            Err(DomainError::ValidationError(_))
        ));

        fx.service
            .create_category("Films".to_string(), "films".to_string())
            .await
            .unwrap();
        let title = Title::new(
            "Dune".to_string(),
            2021,
            None,
            Some("films".to_string()),
            vec!["sci-fi".to_string()],
        );
        assert!(matches!(
            fx.service.create_title(title).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn future_year_is_rejected_on_create_and_update() {
        let fx = fixture();
        let title = Title::new("Dune".to_string(), 9999, None, None, vec![]);
        assert!(matches!(
            fx.service.create_title(title).await,
            Err(DomainError::FutureYear(9999))
        ));

        let created = fx
            .service
            .create_title(Title::new("Dune".to_string(), 2021, None, None, vec![]))
            .await
            .unwrap();
        let patch = TitlePatch {
            year: Some(9999),
            ..Default::default()
        };
        assert!(matches!(
            fx.service.update_title(created.title.id.unwrap(), patch).await,
            Err(DomainError::FutureYear(9999))
        ));
    }

    #[tokio::test]
    async fn title_filters_combine() {
        let fx = fixture();
        fx.service
            .create_category("Films".to_string(), "films".to_string())
            .await
            .unwrap();
        fx.service
            .create_genre("Sci-fi".to_string(), "sci-fi".to_string())
            .await
            .unwrap();
        fx.service
            .create_title(Title::new(
                "Dune".to_string(),
                2021,
                None,
                Some("films".to_string()),
                vec!["sci-fi".to_string()],
            ))
            .await
            .unwrap();
        fx.service
            .create_title(Title::new("Duma".to_string(), 2005, None, None, vec![]))
            .await
            .unwrap();

        let filter = TitleFilter {
            name: Some("du".to_string()),
            ..Default::default()
        };
        assert_eq!(fx.service.list_titles(&filter).await.unwrap().len(), 2);

        let filter = TitleFilter {
            year: Some(2021),
            ..Default::default()
        };
        assert_eq!(fx.service.list_titles(&filter).await.unwrap().len(), 1);

        let filter = TitleFilter {
            genre: Some("sci-fi".to_string()),
            category: Some("films".to_string()),
            ..Default::default()
        };
        let hits = fx.service.list_titles(&filter).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title.name, "Dune");
    }

    #[tokio::test]
    async fn category_search_matches_name_substring() {
        let fx = fixture();
        fx.service
            .create_category("Films".to_string(), "films".to_string())
            .await
            .unwrap();
        fx.service
            .create_category("Music".to_string(), "music".to_string())
            .await
            .unwrap();
        let hits = fx.service.list_categories(Some("fil")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "films");
    }
}
