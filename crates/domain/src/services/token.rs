use crate::entities::User;
use crate::errors::DomainError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Identity claim carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Mints and verifies signed, stateless session tokens (HS256).
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    pub fn mint(&self, user: &User) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.username.clone(),
            role: user.role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::TokenError(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| DomainError::TokenError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-signing-key", Duration::hours(24))
    }

    #[test]
    fn minted_token_carries_the_identity_claim() {
        let mut user = User::new("alice".to_string(), "a@x.com".to_string());
        user.role = Role::Moderator;
        let token = issuer().mint(&user).unwrap();
        let claims = issuer().verify(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.role, "moderator");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(
            issuer().verify("not-a-token"),
            Err(DomainError::TokenError(_))
        ));
    }

    #[test]
    fn tokens_from_another_key_are_rejected() {
        let user = User::new("alice".to_string(), "a@x.com".to_string());
        let token = TokenIssuer::new("other-key", Duration::hours(24))
            .mint(&user)
            .unwrap();
        assert!(issuer().verify(&token).is_err());
    }
}
