//! Per-request user notices
//!
//! Handlers push one-time messages into a [`Notices`] value and attach it to
//! the response document; the rendering layer shows them once. Nothing is kept
//! in a session between requests.
//!
//! # Example
//!
//! ```
//! use todolist_shared::auth::notice::{messages, NoticeLevel, Notices};
//!
//! let mut notices = Notices::new();
//! notices.success(messages::LOGIN_SUCCESS);
//!
//! assert_eq!(notices.messages(NoticeLevel::Success), vec!["Connexion réussie !"]);
//! ```

use serde::{Deserialize, Serialize};

/// User-visible texts
pub mod messages {
    /// Login succeeded
    pub const LOGIN_SUCCESS: &str = "Connexion réussie !";

    /// Login failed; identical for unknown user and wrong password
    pub const INVALID_CREDENTIALS: &str = "Identifiants invalides !";

    /// Task created
    pub const TASK_CREATED: &str = "La tâche a été bien été ajoutée.";

    /// Task edited
    pub const TASK_UPDATED: &str = "La tâche a bien été modifiée.";

    /// Task deleted
    pub const TASK_DELETED: &str = "La tâche a bien été supprimée.";

    /// Task deletion refused by the ownership rule
    pub const TASK_DELETE_DENIED: &str = "Vous n'avez pas les droits pour supprimer cette tâche.";

    /// User created
    pub const USER_CREATED: &str = "L'utilisateur a bien été ajouté.";

    /// User edited
    pub const USER_UPDATED: &str = "L'utilisateur a bien été modifié";

    /// Task marked done or not done
    pub fn task_toggled(title: &str, is_done: bool) -> String {
        if is_done {
            format!("La tâche {} a bien été marquée comme faite.", title)
        } else {
            format!("La tâche {} a bien été marquée comme non terminée.", title)
        }
    }
}

/// Notice category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A single user-visible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Ordered list of notices produced while handling one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notices(Vec<Notice>);

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a success notice
    pub fn success(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(NoticeLevel::Success, message)
    }

    /// Appends an error notice
    pub fn error(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(NoticeLevel::Error, message)
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) -> &mut Self {
        self.0.push(Notice {
            level,
            message: message.into(),
        });
        self
    }

    /// Messages of one level, in insertion order
    pub fn messages(&self, level: NoticeLevel) -> Vec<&str> {
        self.0
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.message.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Notice> for Notices {
    fn from(notice: Notice) -> Self {
        Self(vec![notice])
    }
}
