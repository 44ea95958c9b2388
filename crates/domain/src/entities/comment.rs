use crate::entities::validation::validate_text;
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i32>,
    pub review_id: i32,
    pub author: String, // author username
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

impl Comment {
    pub fn new(review_id: i32, author: String, text: String) -> Self {
        Self {
            id: None,
            review_id,
            author,
            text,
            pub_date: Utc::now(),
        }
    }

    pub fn with_id(
        id: i32,
        review_id: i32,
        author: String,
        text: String,
        pub_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            review_id,
            author,
            text,
            pub_date,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_text(&self.text)
    }
}
