use crate::entities::validation::{validate_email, validate_username};
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of roles. An unrecognized stored value is a configuration
/// error, never a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Result<Role, DomainError> {
        match value {
            "user" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core User entity - represents the acting identity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i32>, // None for new users before persistence
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
    pub is_superuser: bool,
    /// Regenerated on every signup attempt; part of the state that
    /// confirmation codes are derived from.
    pub confirmation_salt: String,
    /// None until the first successful token exchange.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: None,
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: Role::default(),
            is_superuser: false,
            confirmation_salt: fresh_salt(),
            last_login: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    pub fn is_confirmed(&self) -> bool {
        self.last_login.is_some()
    }

    /// Invalidates every previously derived confirmation code.
    pub fn regenerate_salt(&mut self) {
        self.confirmation_salt = fresh_salt();
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        Ok(())
    }
}

fn fresh_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_counts_as_admin() {
        let mut user = User::new("root".to_string(), "root@x.com".to_string());
        assert!(!user.is_admin());
        user.is_superuser = true;
        assert!(user.is_admin());
        user.is_superuser = false;
        user.role = Role::Admin;
        assert!(user.is_admin());
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
        assert!(matches!(
            Role::parse("owner"),
            Err(DomainError::UnknownRole(_))
        ));
    }

    #[test]
    fn regenerating_salt_changes_it() {
        let mut user = User::new("alice".to_string(), "a@x.com".to_string());
        let before = user.confirmation_salt.clone();
        user.regenerate_salt();
        assert_ne!(before, user.confirmation_salt);
    }
}
