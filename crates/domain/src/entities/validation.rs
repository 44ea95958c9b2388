use crate::errors::DomainError;

pub const NAME_MAX_LEN: usize = 256;
pub const SLUG_MAX_LEN: usize = 50;
pub const USERNAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const TEXT_MAX_LEN: usize = 10_000;

/// Reserved in the API surface as the "current user" self-reference.
pub const RESERVED_USERNAME: &str = "me";

pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "Name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Name is longer than {} characters",
            NAME_MAX_LEN
        )));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty() {
        return Err(DomainError::ValidationError(
            "Slug cannot be empty".to_string(),
        ));
    }
    if slug.chars().count() > SLUG_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Slug is longer than {} characters",
            SLUG_MAX_LEN
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::ValidationError(format!(
            "Slug '{}' may only contain letters, digits, hyphens and underscores",
            slug
        )));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username == RESERVED_USERNAME {
        return Err(DomainError::ReservedUsername(username.to_string()));
    }
    if username.is_empty() {
        return Err(DomainError::ValidationError(
            "Username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Username is longer than {} characters",
            USERNAME_MAX_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
    {
        return Err(DomainError::ValidationError(format!(
            "Username '{}' contains forbidden characters",
            username
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "Email cannot be empty".to_string(),
        ));
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Email is longer than {} characters",
            EMAIL_MAX_LEN
        )));
    }
    match email.split_once('@') {
        Some((local, host)) if !local.is_empty() && !host.is_empty() => Ok(()),
        _ => Err(DomainError::ValidationError(
            "Invalid email format".to_string(),
        )),
    }
}

pub fn validate_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "Text cannot be empty".to_string(),
        ));
    }
    if text.chars().count() > TEXT_MAX_LEN {
        return Err(DomainError::ValidationError(format!(
            "Text is longer than {} characters",
            TEXT_MAX_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_username_is_rejected() {
        assert!(matches!(
            validate_username("me"),
            Err(DomainError::ReservedUsername(_))
        ));
    }

    #[test]
    fn username_character_class() {
        assert!(validate_username("alice.b+c@d-e_f").is_ok());
        assert!(validate_username("alice bob").is_err());
        assert!(validate_username("alice!").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn email_needs_local_and_host_parts() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn slug_character_class() {
        assert!(validate_slug("sci-fi_2").is_ok());
        assert!(validate_slug("sci fi").is_err());
        assert!(validate_slug("żanr").is_err());
    }
}
