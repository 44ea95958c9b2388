use crate::entities::validation::validate_name;
use crate::errors::DomainError;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Catalogued item. Category and genres are referenced by slug; the
/// persistence layer resolves them to rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub id: Option<i32>,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category: Option<String>, // category slug
    pub genres: Vec<String>,      // genre slugs
}

impl Title {
    pub fn new(
        name: String,
        year: i32,
        description: Option<String>,
        category: Option<String>,
        genres: Vec<String>,
    ) -> Self {
        Self {
            id: None,
            name,
            year,
            description,
            category,
            genres,
        }
    }

    pub fn with_id(
        id: i32,
        name: String,
        year: i32,
        description: Option<String>,
        category: Option<String>,
        genres: Vec<String>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            year,
            description,
            category,
            genres,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        let current_year = Utc::now().year();
        if self.year > current_year {
            return Err(DomainError::FutureYear(self.year));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_year_is_rejected() {
        let title = Title::new("Somewhere".to_string(), 9999, None, None, vec![]);
        assert!(matches!(title.validate(), Err(DomainError::FutureYear(9999))));
    }

    #[test]
    fn past_year_is_accepted() {
        let title = Title::new("Somewhere".to_string(), 2020, None, None, vec![]);
        assert!(title.validate().is_ok());
    }
}
