use crate::entities::validation::{validate_email, validate_username};
use crate::entities::User;
use crate::errors::DomainError;
use crate::mailer::MailSender;
use crate::repositories::UserRepository;
use crate::services::confirmation::ConfirmationCodes;
use crate::services::token::TokenIssuer;
use chrono::Utc;
use std::sync::Arc;

pub const CONFIRMATION_MAIL_SUBJECT: &str = "Your confirmation code";

/// Passwordless authentication flow: signup delivers a confirmation code
/// by mail, the token endpoint exchanges it for a signed session token.
pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    mail_sender: Arc<dyn MailSender>,
    codes: ConfirmationCodes,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        mail_sender: Arc<dyn MailSender>,
        codes: ConfirmationCodes,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            user_repository,
            mail_sender,
            codes,
            tokens,
        }
    }

    /// Registers (or re-registers) an identity and mails it a fresh
    /// confirmation code. Re-submitting the same (username, email) pair
    /// succeeds again and invalidates the previously issued code.
    pub async fn signup(&self, username: &str, email: &str) -> Result<User, DomainError> {
        validate_username(username)?;
        validate_email(email)?;

        let by_username = self.user_repository.find_by_username(username).await?;
        let by_email = self.user_repository.find_by_email(email).await?;

        let (user, created) = match (by_username, by_email) {
            (Some(existing), Some(other)) if existing.id == other.id => {
                let mut user = existing;
                user.regenerate_salt();
                (self.user_repository.update(&user).await?, false)
            }
            (Some(_), Some(_)) => {
                return Err(DomainError::IdentityConflict(format!(
                    "username '{}' and email '{}' belong to different accounts",
                    username, email
                )))
            }
            (Some(_), None) => {
                return Err(DomainError::IdentityConflict(format!(
                    "username '{}' is already tied to a different email",
                    username
                )))
            }
            (None, Some(_)) => {
                return Err(DomainError::IdentityConflict(format!(
                    "email '{}' is already tied to a different username",
                    email
                )))
            }
            (None, None) => {
                let user = User::new(username.to_string(), email.to_string());
                (self.user_repository.save(&user).await?, true)
            }
        };

        let code = self.codes.issue(&user);
        if let Err(err) = self
            .mail_sender
            .send(&user.email, CONFIRMATION_MAIL_SUBJECT, &code)
            .await
        {
            // Roll back a half-created account so a retried signup is not
            // blocked by it; a pre-existing record is left alone.
            if created {
                if let Some(id) = user.id {
                    self.user_repository.delete(id).await?;
                }
            }
            return Err(err);
        }

        Ok(user)
    }

    /// Exchanges a valid confirmation code for a session token. Unknown
    /// usernames and wrong codes are indistinguishable to the caller.
    pub async fn issue_token(
        &self,
        username: &str,
        confirmation_code: &str,
    ) -> Result<String, DomainError> {
        let Some(mut user) = self.user_repository.find_by_username(username).await? else {
            return Err(DomainError::AccessDenied);
        };
        if !self.codes.check(&user, confirmation_code) {
            return Err(DomainError::AccessDenied);
        }
        // Consumes the code: the state change invalidates it.
        user.last_login = Some(Utc::now());
        let user = self.user_repository.update(&user).await?;
        self.tokens.mint(&user)
    }

    /// Resolves a bearer token to the acting user.
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| DomainError::Unauthenticated)?;
        match self.user_repository.find_by_username(&claims.sub).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingMailSender, InMemoryUsers, RecordingMailSender};
    use chrono::Duration;

    fn service(
        users: Arc<InMemoryUsers>,
        mail: Arc<dyn MailSender>,
    ) -> AuthService {
        AuthService::new(
            users,
            mail,
            ConfirmationCodes::new("test-secret", Duration::days(3)),
            TokenIssuer::new("test-signing-key", Duration::hours(24)),
        )
    }

    #[tokio::test]
    async fn signup_creates_an_unconfirmed_user_and_mails_a_code() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail.clone());

        let user = auth.signup("alice", "a@x.com").await.unwrap();
        assert!(user.id.is_some());
        assert!(!user.is_confirmed());

        let sent = mail.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, CONFIRMATION_MAIL_SUBJECT);
    }

    #[tokio::test]
    async fn signup_is_idempotent_and_rotates_the_code() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail.clone());

        let first = auth.signup("alice", "a@x.com").await.unwrap();
        let first_code = mail.last_body().unwrap();
        let second = auth.signup("alice", "a@x.com").await.unwrap();
        let second_code = mail.last_body().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(users.len(), 1);
        assert_ne!(first_code, second_code);

        // The earlier code died with the salt rotation.
        assert!(matches!(
            auth.issue_token("alice", &first_code).await,
            Err(DomainError::AccessDenied)
        ));
        assert!(auth.issue_token("alice", &second_code).await.is_ok());
    }

    #[tokio::test]
    async fn signup_rejects_identity_pairing_conflicts() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail.clone());
        auth.signup("alice", "a@x.com").await.unwrap();

        assert!(matches!(
            auth.signup("alice", "other@x.com").await,
            Err(DomainError::IdentityConflict(_))
        ));
        assert!(matches!(
            auth.signup("bob", "a@x.com").await,
            Err(DomainError::IdentityConflict(_))
        ));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn signup_rejects_reserved_and_malformed_input() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users, mail);

        assert!(matches!(
            auth.signup("me", "a@x.com").await,
            Err(DomainError::ReservedUsername(_))
        ));
        assert!(matches!(
            auth.signup("al ice", "a@x.com").await,
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(
            auth.signup("alice", "nowhere").await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn delivery_failure_rolls_back_a_fresh_account() {
        let users = Arc::new(InMemoryUsers::default());
        let auth = service(users.clone(), Arc::new(FailingMailSender));

        assert!(matches!(
            auth.signup("alice", "a@x.com").await,
            Err(DomainError::DeliveryError(_))
        ));
        assert_eq!(users.len(), 0, "half-created account must be rolled back");
    }

    #[tokio::test]
    async fn delivery_failure_keeps_a_pre_existing_account() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail);
        auth.signup("alice", "a@x.com").await.unwrap();

        let failing = service(users.clone(), Arc::new(FailingMailSender));
        assert!(matches!(
            failing.signup("alice", "a@x.com").await,
            Err(DomainError::DeliveryError(_))
        ));
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn token_exchange_consumes_the_code() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail.clone());
        auth.signup("alice", "a@x.com").await.unwrap();
        let code = mail.last_body().unwrap();

        let token = auth.issue_token("alice", &code).await.unwrap();
        let user = auth.authenticate(&token).await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.is_confirmed());

        // Single-use by construction: the login changed the state.
        assert!(matches!(
            auth.issue_token("alice", &code).await,
            Err(DomainError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn wrong_code_and_unknown_user_are_indistinguishable() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users.clone(), mail);
        auth.signup("alice", "a@x.com").await.unwrap();

        assert!(matches!(
            auth.issue_token("alice", "12345-badc0de").await,
            Err(DomainError::AccessDenied)
        ));
        assert!(matches!(
            auth.issue_token("nobody", "12345-badc0de").await,
            Err(DomainError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn authenticate_rejects_bad_tokens() {
        let users = Arc::new(InMemoryUsers::default());
        let mail = Arc::new(RecordingMailSender::default());
        let auth = service(users, mail);
        assert!(matches!(
            auth.authenticate("garbage").await,
            Err(DomainError::Unauthenticated)
        ));
    }
}
