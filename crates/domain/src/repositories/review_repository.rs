use crate::entities::Review;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError>;
    async fn find_by_title_and_author(
        &self,
        title_id: i32,
        author: &str,
    ) -> Result<Option<Review>, DomainError>;
    /// Reviews of a title ordered by publication date.
    async fn reviews_of(&self, title_id: i32) -> Result<Vec<Review>, DomainError>;
    async fn save(&self, review: &Review) -> Result<Review, DomainError>;
    async fn update(&self, review: &Review) -> Result<Review, DomainError>;
    /// Cascades to the review's comments.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
