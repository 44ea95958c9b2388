use crate::entities::User;

/// What a request wants to do with a resource. Reads are the safe
/// actions; everything else mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn is_safe(&self) -> bool {
        matches!(self, Action::Read)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Category,
    Genre,
    Title,
    Review,
    Comment,
    UserAccount,
}

/// The identity making a request, passed explicitly to every decision
/// point instead of living in ambient request state.
#[derive(Debug, Clone)]
pub enum Actor {
    Anonymous,
    User(User),
}

impl Actor {
    pub fn user(&self) -> Option<&User> {
        match self {
            Actor::Anonymous => None,
            Actor::User(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User(_))
    }

    fn is_admin(&self) -> bool {
        self.user().map(User::is_admin).unwrap_or(false)
    }
}

/// Collection-level check: decides from the resource type and action
/// alone, before any object is fetched.
pub fn may_access(actor: &Actor, action: Action, resource: ResourceKind) -> bool {
    if action.is_safe() {
        return true;
    }
    match resource {
        // Catalogue taxonomy and identity management are admin territory.
        ResourceKind::Category | ResourceKind::Genre | ResourceKind::Title => actor.is_admin(),
        ResourceKind::UserAccount => actor.is_admin(),
        // Any authenticated actor may write reviews and comments; who may
        // touch a specific one is the object-level check's concern.
        ResourceKind::Review | ResourceKind::Comment => actor.is_authenticated(),
    }
}

/// Object-level check for owned content (reviews, comments). Evaluated
/// only after `may_access` already passed.
pub fn may_modify(actor: &Actor, action: Action, author: &str) -> bool {
    if action.is_safe() {
        return true;
    }
    match actor {
        Actor::Anonymous => false,
        Actor::User(user) => user.username == author || user.is_admin() || user.is_moderator(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Role;

    fn actor_with_role(role: Role) -> Actor {
        let mut user = User::new(format!("{}-actor", role), format!("{}@x.com", role));
        user.role = role;
        Actor::User(user)
    }

    #[test]
    fn reads_are_public() {
        for resource in [
            ResourceKind::Category,
            ResourceKind::Genre,
            ResourceKind::Title,
            ResourceKind::Review,
            ResourceKind::Comment,
            ResourceKind::UserAccount,
        ] {
            assert!(may_access(&Actor::Anonymous, Action::Read, resource));
        }
    }

    #[test]
    fn catalogue_writes_require_admin() {
        for resource in [ResourceKind::Category, ResourceKind::Genre, ResourceKind::Title] {
            for action in [Action::Create, Action::Update, Action::Delete] {
                assert!(!may_access(&Actor::Anonymous, action, resource));
                assert!(!may_access(&actor_with_role(Role::User), action, resource));
                assert!(!may_access(&actor_with_role(Role::Moderator), action, resource));
                assert!(may_access(&actor_with_role(Role::Admin), action, resource));
            }
        }
    }

    #[test]
    fn superuser_flag_is_admin_equivalent() {
        let mut user = User::new("root".to_string(), "root@x.com".to_string());
        user.is_superuser = true;
        let actor = Actor::User(user);
        assert!(may_access(&actor, Action::Delete, ResourceKind::Title));
        assert!(may_access(&actor, Action::Create, ResourceKind::UserAccount));
    }

    #[test]
    fn review_creation_requires_authentication_only() {
        assert!(!may_access(&Actor::Anonymous, Action::Create, ResourceKind::Review));
        assert!(may_access(
            &actor_with_role(Role::User),
            Action::Create,
            ResourceKind::Review
        ));
        assert!(may_access(
            &actor_with_role(Role::User),
            Action::Create,
            ResourceKind::Comment
        ));
    }

    #[test]
    fn object_checks_allow_author_and_privileged_roles() {
        let author = actor_with_role(Role::User);
        let author_name = author.user().unwrap().username.clone();
        assert!(may_modify(&author, Action::Update, &author_name));
        assert!(may_modify(&author, Action::Delete, &author_name));

        assert!(!may_modify(&actor_with_role(Role::User), Action::Delete, "someone-else"));
        assert!(may_modify(&actor_with_role(Role::Moderator), Action::Delete, "someone-else"));
        assert!(may_modify(&actor_with_role(Role::Admin), Action::Update, "someone-else"));
        assert!(!may_modify(&Actor::Anonymous, Action::Delete, "someone-else"));
    }
}
