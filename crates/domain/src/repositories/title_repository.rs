use crate::entities::Title;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait TitleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Title>, DomainError>;
    async fn save(&self, title: &Title) -> Result<Title, DomainError>;
    async fn update(&self, title: &Title) -> Result<Title, DomainError>;
    /// Cascades to the title's reviews and their comments.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
    /// All titles ordered by id.
    async fn find_all(&self) -> Result<Vec<Title>, DomainError>;
}
