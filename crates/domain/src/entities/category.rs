use crate::entities::validation::{validate_name, validate_slug};
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// Taxonomy node grouping titles (film, book, music...). The slug is the
/// natural key used in URLs and cross-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i32>,
    pub name: String,
    pub slug: String,
}

impl Category {
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
