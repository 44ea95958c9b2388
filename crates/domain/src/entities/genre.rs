use crate::entities::validation::{validate_name, validate_slug};
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Option<i32>,
    pub name: String,
    pub slug: String,
}

impl Genre {
    pub fn new(name: String, slug: String) -> Self {
        Self {
            id: None,
            name,
            slug,
        }
    }

    pub fn with_id(id: i32, name: String, slug: String) -> Self {
        Self {
            id: Some(id),
            name,
            slug,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_slug(&self.slug)?;
        Ok(())
    }
}
