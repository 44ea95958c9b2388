//! In-memory fakes behind the repository and mail ports, for service tests.

use crate::entities::{Category, Comment, Genre, Review, Title, User};
use crate::errors::DomainError;
use crate::mailer::MailSender;
use crate::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

fn next(counter: &AtomicI32) -> i32 {
    counter.fetch_add(1, Ordering::SeqCst) + 1
}

#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
    next_id: AtomicI32,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == Some(id))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut stored = user.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::UserNotFound(user.username.clone()))?;
        *row = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|u| u.id != Some(id));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryCategories {
    rows: Mutex<Vec<Category>>,
    next_id: AtomicI32,
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn save(&self, category: &Category) -> Result<Category, DomainError> {
        let mut stored = category.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|c| c.slug != slug);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryGenres {
    rows: Mutex<Vec<Genre>>,
    next_id: AtomicI32,
}

#[async_trait]
impl GenreRepository for InMemoryGenres {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.slug == slug)
            .cloned())
    }

    async fn save(&self, genre: &Genre) -> Result<Genre, DomainError> {
        let mut stored = genre.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|g| g.slug != slug);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryTitles {
    rows: Mutex<Vec<Title>>,
    next_id: AtomicI32,
}

#[async_trait]
impl TitleRepository for InMemoryTitles {
    async fn find_by_id(&self, id: i32) -> Result<Option<Title>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == Some(id))
            .cloned())
    }

    async fn save(&self, title: &Title) -> Result<Title, DomainError> {
        let mut stored = title.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, title: &Title) -> Result<Title, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|t| t.id == title.id)
            .ok_or(DomainError::TitleNotFound(title.id.unwrap_or(0)))?;
        *row = title.clone();
        Ok(title.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|t| t.id != Some(id));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Title>, DomainError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryReviews {
    rows: Mutex<Vec<Review>>,
    next_id: AtomicI32,
}

#[async_trait]
impl ReviewRepository for InMemoryReviews {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == Some(id))
            .cloned())
    }

    async fn find_by_title_and_author(
        &self,
        title_id: i32,
        author: &str,
    ) -> Result<Option<Review>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.title_id == title_id && r.author == author)
            .cloned())
    }

    async fn reviews_of(&self, title_id: i32) -> Result<Vec<Review>, DomainError> {
        let mut reviews: Vec<Review> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.title_id == title_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.pub_date);
        Ok(reviews)
    }

    async fn save(&self, review: &Review) -> Result<Review, DomainError> {
        let mut stored = review.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, review: &Review) -> Result<Review, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or(DomainError::ReviewNotFound(review.id.unwrap_or(0)))?;
        *row = review.clone();
        Ok(review.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|r| r.id != Some(id));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryComments {
    rows: Mutex<Vec<Comment>>,
    next_id: AtomicI32,
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned())
    }

    async fn comments_of(&self, review_id: i32) -> Result<Vec<Comment>, DomainError> {
        let mut comments: Vec<Comment> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.review_id == review_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.pub_date);
        Ok(comments)
    }

    async fn save(&self, comment: &Comment) -> Result<Comment, DomainError> {
        let mut stored = comment.clone();
        stored.id = Some(next(&self.next_id));
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, DomainError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id.unwrap_or(0)))?;
        *row = comment.clone();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.rows.lock().unwrap().retain(|c| c.id != Some(id));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingMailSender {
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailSender {
    pub fn last_body(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.body.clone())
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub struct FailingMailSender;

#[async_trait]
impl MailSender for FailingMailSender {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), DomainError> {
        Err(DomainError::DeliveryError(
            "mail gateway refused the message".to_string(),
        ))
    }
}
