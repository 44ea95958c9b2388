use crate::entities::{Comment, User};
use crate::errors::DomainError;
use crate::repositories::{CommentRepository, ReviewRepository, TitleRepository};
use std::sync::Arc;

pub struct CommentService {
    comment_repository: Arc<dyn CommentRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    title_repository: Arc<dyn TitleRepository>,
}

impl CommentService {
    pub fn new(
        comment_repository: Arc<dyn CommentRepository>,
        review_repository: Arc<dyn ReviewRepository>,
        title_repository: Arc<dyn TitleRepository>,
    ) -> Self {
        Self {
            comment_repository,
            review_repository,
            title_repository,
        }
    }

    pub async fn comments_of(
        &self,
        title_id: i32,
        review_id: i32,
    ) -> Result<Vec<Comment>, DomainError> {
        self.check_review(title_id, review_id).await?;
        self.comment_repository.comments_of(review_id).await
    }

    pub async fn get_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> Result<Comment, DomainError> {
        self.check_review(title_id, review_id).await?;
        match self.comment_repository.find_by_id(comment_id).await? {
            Some(comment) if comment.review_id == review_id => Ok(comment),
            _ => Err(DomainError::CommentNotFound(comment_id)),
        }
    }

    pub async fn create_comment(
        &self,
        title_id: i32,
        review_id: i32,
        author: &User,
        text: String,
    ) -> Result<Comment, DomainError> {
        self.check_review(title_id, review_id).await?;
        let comment = Comment::new(review_id, author.username.clone(), text);
        comment.validate()?;
        self.comment_repository.save(&comment).await
    }

    pub async fn update_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
        text: String,
    ) -> Result<Comment, DomainError> {
        let mut comment = self.get_comment(title_id, review_id, comment_id).await?;
        comment.text = text;
        comment.validate()?;
        self.comment_repository.update(&comment).await
    }

    pub async fn delete_comment(
        &self,
        title_id: i32,
        review_id: i32,
        comment_id: i32,
    ) -> Result<(), DomainError> {
        self.get_comment(title_id, review_id, comment_id).await?;
        self.comment_repository.delete(comment_id).await
    }

    /// The nested route only makes sense when the review belongs to the
    /// title it is addressed under.
    async fn check_review(&self, title_id: i32, review_id: i32) -> Result<(), DomainError> {
        if self.title_repository.find_by_id(title_id).await?.is_none() {
            return Err(DomainError::TitleNotFound(title_id));
        }
        match self.review_repository.find_by_id(review_id).await? {
            Some(review) if review.title_id == title_id => Ok(()),
            _ => Err(DomainError::ReviewNotFound(review_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Review, Title};
    use crate::repositories::{ReviewRepository as _, TitleRepository as _};
    use crate::test_support::{InMemoryComments, InMemoryReviews, InMemoryTitles};

    async fn fixture() -> (CommentService, i32, i32) {
        let titles = Arc::new(InMemoryTitles::default());
        let reviews = Arc::new(InMemoryReviews::default());
        let title = titles
            .save(&Title::new("Dune".to_string(), 2021, None, None, vec![]))
            .await
            .unwrap();
        let title_id = title.id.unwrap();
        let review = reviews
            .save(&Review::new(
                title_id,
                "alice".to_string(),
                "great".to_string(),
                9,
            ))
            .await
            .unwrap();
        let service = CommentService::new(Arc::new(InMemoryComments::default()), reviews, titles);
        (service, title_id, review.id.unwrap())
    }

    fn author(name: &str) -> User {
        User::new(name.to_string(), format!("{}@x.com", name))
    }

    #[tokio::test]
    async fn comments_attach_to_their_review() {
        let (service, title_id, review_id) = fixture().await;
        service
            .create_comment(title_id, review_id, &author("bob"), "agreed".to_string())
            .await
            .unwrap();
        let comments = service.comments_of(title_id, review_id).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "bob");
    }

    #[tokio::test]
    async fn the_review_must_belong_to_the_title() {
        let (service, title_id, review_id) = fixture().await;
        assert!(matches!(
            service.comments_of(title_id + 1, review_id).await,
            Err(DomainError::TitleNotFound(_))
        ));
        assert!(matches!(
            service
                .create_comment(title_id, review_id + 1, &author("bob"), "hi".to_string())
                .await,
            Err(DomainError::ReviewNotFound(_))
        ));
    }

    #[tokio::test]
    async fn empty_comments_are_rejected() {
        let (service, title_id, review_id) = fixture().await;
        assert!(matches!(
            service
                .create_comment(title_id, review_id, &author("bob"), "  ".to_string())
                .await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let (service, title_id, review_id) = fixture().await;
        let comment = service
            .create_comment(title_id, review_id, &author("bob"), "agreed".to_string())
            .await
            .unwrap();
        let id = comment.id.unwrap();

        let updated = service
            .update_comment(title_id, review_id, id, "changed my mind".to_string())
            .await
            .unwrap();
        assert_eq!(updated.text, "changed my mind");

        service
            .delete_comment(title_id, review_id, id)
            .await
            .unwrap();
        assert!(service.comments_of(title_id, review_id).await.unwrap().is_empty());
    }
}
