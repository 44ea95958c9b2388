use crate::entities::Genre;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError>;
    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError>;
    /// Links from titles to the genre are removed; the titles stay.
    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError>;
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;
}
