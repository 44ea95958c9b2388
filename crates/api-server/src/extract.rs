use crate::AppState;
use axum::http::{header, HeaderMap};
use domain::{may_access, may_modify, Action, Actor, DomainError, ResourceKind};

/// Resolves the acting identity from the Authorization header. A missing
/// header is an anonymous actor; a present but invalid one is an error.
pub async fn current_actor(state: &AppState, headers: &HeaderMap) -> Result<Actor, DomainError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(Actor::Anonymous);
    };
    let value = value.to_str().map_err(|_| DomainError::Unauthenticated)?;
    let Some(token) = value.strip_prefix("Bearer ") else {
        return Err(DomainError::Unauthenticated);
    };
    let user = state.app.auth_service.authenticate(token.trim()).await?;
    Ok(Actor::User(user))
}

/// Collection-level gate: anonymous actors get 401, authenticated ones
/// without the role get 403.
pub fn require_access(
    actor: &Actor,
    action: Action,
    resource: ResourceKind,
) -> Result<(), DomainError> {
    if may_access(actor, action, resource) {
        return Ok(());
    }
    if actor.is_authenticated() {
        Err(DomainError::PermissionDenied(
            "insufficient role for this operation".to_string(),
        ))
    } else {
        Err(DomainError::Unauthenticated)
    }
}

/// Identity management is admin territory even for reads, unlike the
/// public catalogue.
pub fn require_admin(actor: &Actor) -> Result<(), DomainError> {
    match actor.user() {
        Some(user) if user.is_admin() => Ok(()),
        Some(_) => Err(DomainError::PermissionDenied(
            "administrator role required".to_string(),
        )),
        None => Err(DomainError::Unauthenticated),
    }
}

/// Object-level gate for owned content.
pub fn require_modify(actor: &Actor, action: Action, author: &str) -> Result<(), DomainError> {
    if may_modify(actor, action, author) {
        return Ok(());
    }
    if actor.is_authenticated() {
        Err(DomainError::PermissionDenied(
            "only the author, moderators and admins may do this".to_string(),
        ))
    } else {
        Err(DomainError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Role, User};

    fn actor(role: Role) -> Actor {
        let mut user = User::new("someone".to_string(), "s@x.com".to_string());
        user.role = role;
        Actor::User(user)
    }

    #[test]
    fn anonymous_writers_get_unauthenticated() {
        assert!(matches!(
            require_access(&Actor::Anonymous, Action::Create, ResourceKind::Title),
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            require_modify(&Actor::Anonymous, Action::Delete, "alice"),
            Err(DomainError::Unauthenticated)
        ));
    }

    #[test]
    fn authenticated_without_role_get_permission_denied() {
        assert!(matches!(
            require_access(&actor(Role::User), Action::Create, ResourceKind::Title),
            Err(DomainError::PermissionDenied(_))
        ));
        assert!(matches!(
            require_modify(&actor(Role::User), Action::Delete, "alice"),
            Err(DomainError::PermissionDenied(_))
        ));
        assert!(require_modify(&actor(Role::Moderator), Action::Delete, "alice").is_ok());
    }

    #[test]
    fn admin_gate_distinguishes_401_and_403() {
        assert!(matches!(
            require_admin(&Actor::Anonymous),
            Err(DomainError::Unauthenticated)
        ));
        assert!(matches!(
            require_admin(&actor(Role::Moderator)),
            Err(DomainError::PermissionDenied(_))
        ));
        assert!(require_admin(&actor(Role::Admin)).is_ok());
    }
}
