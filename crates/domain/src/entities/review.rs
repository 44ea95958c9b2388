use crate::entities::validation::validate_text;
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 10;

/// A scored review of a title. At most one per (title, author) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Option<i32>,
    pub title_id: i32,
    pub author: String, // author username
    pub text: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

impl Review {
    pub fn new(title_id: i32, author: String, text: String, score: i32) -> Self {
        Self {
            id: None,
            title_id,
            author,
            text,
            score,
            pub_date: Utc::now(),
        }
    }

    pub fn with_id(
        id: i32,
        title_id: i32,
        author: String,
        text: String,
        score: i32,
        pub_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            title_id,
            author,
            text,
            score,
            pub_date,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_text(&self.text)?;
        if !(SCORE_MIN..=SCORE_MAX).contains(&self.score) {
            return Err(DomainError::ScoreOutOfRange(self.score));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_are_inclusive() {
        for score in [SCORE_MIN, 5, SCORE_MAX] {
            let review = Review::new(1, "alice".to_string(), "fine".to_string(), score);
            assert!(review.validate().is_ok(), "score {} should pass", score);
        }
        for score in [0, 11, -3] {
            let review = Review::new(1, "alice".to_string(), "fine".to_string(), score);
            assert!(
                matches!(review.validate(), Err(DomainError::ScoreOutOfRange(s)) if s == score),
                "score {} should fail",
                score
            );
        }
    }
}
