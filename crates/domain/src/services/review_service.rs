use crate::entities::{Review, User};
use crate::errors::DomainError;
use crate::repositories::{ReviewRepository, TitleRepository};
use std::sync::Arc;

pub struct ReviewService {
    review_repository: Arc<dyn ReviewRepository>,
    title_repository: Arc<dyn TitleRepository>,
}

impl ReviewService {
    pub fn new(
        review_repository: Arc<dyn ReviewRepository>,
        title_repository: Arc<dyn TitleRepository>,
    ) -> Self {
        Self {
            review_repository,
            title_repository,
        }
    }

    pub async fn reviews_of(&self, title_id: i32) -> Result<Vec<Review>, DomainError> {
        self.check_title(title_id).await?;
        self.review_repository.reviews_of(title_id).await
    }

    pub async fn get_review(&self, title_id: i32, review_id: i32) -> Result<Review, DomainError> {
        self.check_title(title_id).await?;
        match self.review_repository.find_by_id(review_id).await? {
            Some(review) if review.title_id == title_id => Ok(review),
            _ => Err(DomainError::ReviewNotFound(review_id)),
        }
    }

    /// At most one review per (title, author); checked here for a
    /// friendly error, enforced authoritatively by the storage schema.
    pub async fn create_review(
        &self,
        title_id: i32,
        author: &User,
        text: String,
        score: i32,
    ) -> Result<Review, DomainError> {
        self.check_title(title_id).await?;
        let review = Review::new(title_id, author.username.clone(), text, score);
        review.validate()?;
        if self
            .review_repository
            .find_by_title_and_author(title_id, &author.username)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateReview(author.username.clone()));
        }
        self.review_repository.save(&review).await
    }

    pub async fn update_review(
        &self,
        title_id: i32,
        review_id: i32,
        text: Option<String>,
        score: Option<i32>,
    ) -> Result<Review, DomainError> {
        let mut review = self.get_review(title_id, review_id).await?;
        if let Some(text) = text {
            review.text = text;
        }
        if let Some(score) = score {
            review.score = score;
        }
        review.validate()?;
        self.review_repository.update(&review).await
    }

    pub async fn delete_review(&self, title_id: i32, review_id: i32) -> Result<(), DomainError> {
        self.get_review(title_id, review_id).await?;
        self.review_repository.delete(review_id).await
    }

    async fn check_title(&self, title_id: i32) -> Result<(), DomainError> {
        if self.title_repository.find_by_id(title_id).await?.is_none() {
            return Err(DomainError::TitleNotFound(title_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Title;
    use crate::repositories::TitleRepository as _;
    use crate::test_support::{InMemoryReviews, InMemoryTitles};

    async fn fixture() -> (ReviewService, i32) {
        let titles = Arc::new(InMemoryTitles::default());
        let saved = titles
            .save(&Title::new("Dune".to_string(), 2021, None, None, vec![]))
            .await
            .unwrap();
        let service = ReviewService::new(Arc::new(InMemoryReviews::default()), titles);
        (service, saved.id.unwrap())
    }

    fn author(name: &str) -> User {
        User::new(name.to_string(), format!("{}@x.com", name))
    }

    #[tokio::test]
    async fn one_review_per_title_and_author() {
        let (service, title_id) = fixture().await;
        let alice = author("alice");
        service
            .create_review(title_id, &alice, "great".to_string(), 9)
            .await
            .unwrap();

        assert!(matches!(
            service
                .create_review(title_id, &alice, "again".to_string(), 8)
                .await,
            Err(DomainError::DuplicateReview(_))
        ));

        // A different author is fine.
        service
            .create_review(title_id, &author("bob"), "meh".to_string(), 4)
            .await
            .unwrap();
        assert_eq!(service.reviews_of(title_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn out_of_range_scores_are_rejected() {
        let (service, title_id) = fixture().await;
        for score in [0, 11] {
            assert!(matches!(
                service
                    .create_review(title_id, &author("alice"), "text".to_string(), score)
                    .await,
                Err(DomainError::ScoreOutOfRange(_))
            ));
        }
    }

    #[tokio::test]
    async fn reviews_need_an_existing_title() {
        let (service, _) = fixture().await;
        assert!(matches!(
            service
                .create_review(999, &author("alice"), "text".to_string(), 5)
                .await,
            Err(DomainError::TitleNotFound(999))
        ));
        assert!(matches!(
            service.reviews_of(999).await,
            Err(DomainError::TitleNotFound(999))
        ));
    }

    #[tokio::test]
    async fn review_lookup_is_scoped_to_the_title() {
        let (service, title_id) = fixture().await;
        let review = service
            .create_review(title_id, &author("alice"), "great".to_string(), 9)
            .await
            .unwrap();
        assert!(matches!(
            service.get_review(title_id, review.id.unwrap() + 1).await,
            Err(DomainError::ReviewNotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_revalidates_the_score() {
        let (service, title_id) = fixture().await;
        let review = service
            .create_review(title_id, &author("alice"), "great".to_string(), 9)
            .await
            .unwrap();
        let id = review.id.unwrap();

        let updated = service
            .update_review(title_id, id, None, Some(10))
            .await
            .unwrap();
        assert_eq!(updated.score, 10);

        assert!(matches!(
            service.update_review(title_id, id, None, Some(0)).await,
            Err(DomainError::ScoreOutOfRange(0))
        ));
    }
}
