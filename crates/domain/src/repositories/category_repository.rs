use crate::entities::Category;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError>;
    async fn save(&self, category: &Category) -> Result<Category, DomainError>;
    /// Titles referencing the category are kept with their category cleared.
    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError>;
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;
}
