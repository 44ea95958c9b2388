use crate::entities::User;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex characters of the mac kept in the code.
const DIGEST_LEN: usize = 20;

/// Issues and validates single-use confirmation codes of the form
/// `{timestamp}-{digest}`. The digest is keyed on the user's mutable
/// state, so any change to the record (including the login that consumes
/// the code, which bumps `last_login`) invalidates everything issued
/// before it. No consumed-flag is stored anywhere.
pub struct ConfirmationCodes {
    secret: String,
    max_age: Duration,
}

impl ConfirmationCodes {
    pub fn new(secret: impl Into<String>, max_age: Duration) -> Self {
        Self {
            secret: secret.into(),
            max_age,
        }
    }

    pub fn issue(&self, user: &User) -> String {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> String {
        let timestamp = now.timestamp();
        format!("{}-{}", timestamp, self.digest(user, timestamp))
    }

    pub fn check(&self, user: &User, code: &str) -> bool {
        let Some((timestamp_part, digest)) = code.split_once('-') else {
            return false;
        };
        let Ok(timestamp) = timestamp_part.parse::<i64>() else {
            return false;
        };
        if digest != self.digest(user, timestamp) {
            return false;
        }
        let age = Utc::now().timestamp() - timestamp;
        age >= 0 && age <= self.max_age.num_seconds()
    }

    fn digest(&self, user: &User, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("hmac accepts keys of any length");
        mac.update(user_state(user).as_bytes());
        mac.update(b"\0");
        mac.update(timestamp.to_string().as_bytes());
        let bytes = mac.finalize().into_bytes();
        hex::encode(bytes)[..DIGEST_LEN].to_string()
    }
}

/// Every mutable field of the record takes part, so stale codes cannot
/// survive an account change.
fn user_state(user: &User) -> String {
    format!(
        "{}\0{}\0{}\0{}\0{}\0{}\0{}\0{}\0{}",
        user.id.unwrap_or_default(),
        user.username,
        user.email,
        user.role,
        user.first_name,
        user.last_name,
        user.bio,
        user.confirmation_salt,
        user.last_login
            .map(|at| at.timestamp().to_string())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes() -> ConfirmationCodes {
        ConfirmationCodes::new("test-secret", Duration::days(3))
    }

    fn user() -> User {
        let mut user = User::new("alice".to_string(), "a@x.com".to_string());
        user.id = Some(7);
        user
    }

    #[test]
    fn issued_code_checks_out() {
        let codes = codes();
        let user = user();
        let code = codes.issue(&user);
        assert!(codes.check(&user, &code));
    }

    #[test]
    fn tampered_code_fails() {
        let codes = codes();
        let user = user();
        let code = codes.issue(&user);
        let mut tampered = code.clone();
        tampered.pop();
        tampered.push('x');
        assert!(!codes.check(&user, &tampered));
        assert!(!codes.check(&user, "not-a-code"));
        assert!(!codes.check(&user, ""));
    }

    #[test]
    fn any_state_change_invalidates_the_code() {
        let codes = codes();
        let mut user = user();
        let code = codes.issue(&user);

        let mut renamed = user.clone();
        renamed.bio = "now with a bio".to_string();
        assert!(!codes.check(&renamed, &code));

        user.last_login = Some(Utc::now());
        assert!(!codes.check(&user, &code));
    }

    #[test]
    fn fresh_salt_invalidates_the_code() {
        let codes = codes();
        let mut user = user();
        let code = codes.issue(&user);
        user.regenerate_salt();
        assert!(!codes.check(&user, &code));
    }

    #[test]
    fn expired_code_fails() {
        let codes = codes();
        let user = user();
        let stale = codes.issue_at(&user, Utc::now() - Duration::days(4));
        assert!(!codes.check(&user, &stale));
    }

    #[test]
    fn code_from_the_future_fails() {
        let codes = codes();
        let user = user();
        let ahead = codes.issue_at(&user, Utc::now() + Duration::hours(2));
        assert!(!codes.check(&user, &ahead));
    }

    #[test]
    fn different_secrets_disagree() {
        let user = user();
        let code = codes().issue(&user);
        let other = ConfirmationCodes::new("other-secret", Duration::days(3));
        assert!(!other.check(&user, &code));
    }
}
