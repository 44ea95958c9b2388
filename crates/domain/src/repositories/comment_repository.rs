use crate::entities::Comment;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, DomainError>;
    /// Comments of a review ordered by publication date.
    async fn comments_of(&self, review_id: i32) -> Result<Vec<Comment>, DomainError>;
    async fn save(&self, comment: &Comment) -> Result<Comment, DomainError>;
    async fn update(&self, comment: &Comment) -> Result<Comment, DomainError>;
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
