//! Security context of the current request.

use serde::{Deserialize, Serialize};

use super::authorization::{AccessChecker, Capability};
use crate::models::user::{Role, User, UserId};

/// Identity of a signed-in user, read from storage on each request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    pub id: UserId,
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthenticatedPrincipal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<&User> for AuthenticatedPrincipal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            roles: user.role_set(),
        }
    }
}

/// Who is making the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SecurityContext {
    #[default]
    Anonymous,
    Authenticated(AuthenticatedPrincipal),
}

impl From<&User> for SecurityContext {
    /// Context for a user loaded from storage. Unknown role tags are dropped.
    fn from(user: &User) -> Self {
        SecurityContext::Authenticated(AuthenticatedPrincipal::from(user))
    }
}

impl SecurityContext {
    pub fn principal(&self) -> Option<&AuthenticatedPrincipal> {
        match self {
            SecurityContext::Anonymous => None,
            SecurityContext::Authenticated(principal) => Some(principal),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, SecurityContext::Anonymous)
    }
}

impl AccessChecker for SecurityContext {
    fn is_granted(&self, capability: Capability) -> bool {
        match (self, capability) {
            (SecurityContext::Anonymous, _) => false,
            (SecurityContext::Authenticated(_), Capability::AuthenticatedFully) => true,
            (SecurityContext::Authenticated(p), Capability::RoleAdmin) => p.has_role(Role::Admin),
        }
    }

    fn principal_id(&self) -> Option<UserId> {
        self.principal().map(|p| p.id)
    }
}
