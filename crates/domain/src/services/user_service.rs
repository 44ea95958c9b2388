use crate::entities::validation::{validate_email, validate_username};
use crate::entities::{Role, User};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use std::sync::Arc;

/// Admin-supplied fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

/// Partial profile update. The role is deliberately absent: it is never
/// writable through profile updates, only at admin creation time.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        validate_username(&new_user.username)?;
        validate_email(&new_user.email)?;

        if self
            .user_repository
            .find_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::IdentityConflict(format!(
                "username '{}' is already in use",
                new_user.username
            )));
        }
        if self
            .user_repository
            .find_by_email(&new_user.email)
            .await?
            .is_some()
        {
            return Err(DomainError::IdentityConflict(format!(
                "email '{}' is already in use",
                new_user.email
            )));
        }

        let mut user = User::new(new_user.username, new_user.email);
        if let Some(role) = new_user.role {
            user.role = role;
        }
        if let Some(first_name) = new_user.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = new_user.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = new_user.bio {
            user.bio = bio;
        }
        self.user_repository.save(&user).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        match self.user_repository.find_by_username(username).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::UserNotFound(username.to_string())),
        }
    }

    pub async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>, DomainError> {
        let users = self.user_repository.find_all().await?;
        Ok(match search {
            Some(needle) => users
                .into_iter()
                .filter(|u| u.username.contains(needle))
                .collect(),
            None => users,
        })
    }

    /// Applies a partial profile update. The stored role is preserved
    /// whatever the caller sent.
    pub async fn update_profile(
        &self,
        username: &str,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        let mut user = self.get_by_username(username).await?;

        if let Some(new_username) = patch.username {
            if new_username != user.username {
                validate_username(&new_username)?;
                if self
                    .user_repository
                    .find_by_username(&new_username)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::IdentityConflict(format!(
                        "username '{}' is already in use",
                        new_username
                    )));
                }
                user.username = new_username;
            }
        }
        if let Some(new_email) = patch.email {
            if new_email != user.email {
                validate_email(&new_email)?;
                if self
                    .user_repository
                    .find_by_email(&new_email)
                    .await?
                    .is_some()
                {
                    return Err(DomainError::IdentityConflict(format!(
                        "email '{}' is already in use",
                        new_email
                    )));
                }
                user.email = new_email;
            }
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }

        user.validate()?;
        self.user_repository.update(&user).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), DomainError> {
        let user = self.get_by_username(username).await?;
        match user.id {
            Some(id) => self.user_repository.delete(id).await,
            None => Err(DomainError::UserNotFound(username.to_string())),
        }
    }
}
