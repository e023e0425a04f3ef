/// Capability checks and the task deletion policy
///
/// Access decisions go through the closed [`Capability`] enum and an
/// [`AccessChecker`], never through role strings.
///
/// # Task deletion
///
/// A task may be deleted when both hold:
///
/// 1. the actor is fully authenticated or holds `ROLE_ADMIN`
/// 2. the task has no owner, or the actor is its owner
///
/// Owner ids that are not strictly positive count as "no owner".
///
/// # Example
///
/// ```
/// use todolist_shared::auth::authorization::{authorize_task_deletion, AccessChecker, Capability};
/// use todolist_shared::auth::context::SecurityContext;
/// use todolist_shared::models::task::Task;
/// # use chrono::Utc;
///
/// let actor = SecurityContext::Anonymous;
/// let task = Task {
///     id: 1,
///     created_at: Utc::now(),
///     title: "Courses".into(),
///     content: "Lait, pain".into(),
///     is_done: false,
///     owner_id: None,
/// };
///
/// assert!(!actor.is_granted(Capability::AuthenticatedFully));
/// assert!(authorize_task_deletion(&actor, &task).is_err());
/// ```

use std::fmt;

use tracing::debug;

use crate::models::task::Task;
use crate::models::user::UserId;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Actor lacks a required capability
    #[error("Access denied: requires {0}")]
    MissingCapability(Capability),

    /// Ownership rule refused the deletion
    #[error("Vous n'avez pas les droits pour supprimer cette tâche.")]
    AuthorizationDenied,
}

/// Capabilities an actor can be checked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Logged in during this session (not remembered)
    AuthenticatedFully,

    /// Holds the administrator role
    RoleAdmin,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::AuthenticatedFully => "IS_AUTHENTICATED_FULLY",
            Capability::RoleAdmin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers capability questions about the current actor
pub trait AccessChecker {
    fn is_granted(&self, capability: Capability) -> bool;

    /// Id of the acting user, `None` when anonymous
    fn principal_id(&self) -> Option<UserId>;
}

/// Fails unless the actor holds `capability`
///
/// An actor that is not signed in is reported as missing
/// `AuthenticatedFully`, whatever capability was asked for.
pub fn require_capability<C>(checker: &C, capability: Capability) -> Result<(), AuthzError>
where
    C: AccessChecker + ?Sized,
{
    if checker.is_granted(capability) {
        Ok(())
    } else if !checker.is_granted(Capability::AuthenticatedFully) {
        Err(AuthzError::MissingCapability(Capability::AuthenticatedFully))
    } else {
        Err(AuthzError::MissingCapability(capability))
    }
}

/// Decides whether the actor may delete `task`
pub fn authorize_task_deletion<C>(checker: &C, task: &Task) -> Result<(), AuthzError>
where
    C: AccessChecker + ?Sized,
{
    let authenticated = checker.is_granted(Capability::AuthenticatedFully);
    let admin = checker.is_granted(Capability::RoleAdmin);

    let owner_matches = match task.owner_identity() {
        None => true,
        Some(owner) => checker.principal_id() == Some(owner),
    };

    debug!(
        task_id = task.id,
        authenticated,
        admin,
        owner_matches,
        "Evaluating task deletion"
    );

    if (authenticated || admin) && owner_matches {
        Ok(())
    } else {
        Err(AuthzError::AuthorizationDenied)
    }
}
