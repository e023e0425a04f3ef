//! Homepage.

use serde::Serialize;
use todolist_shared::auth::context::AuthenticatedPrincipal;

use crate::{response::Page, session::Actor};

#[derive(Debug, Serialize)]
pub struct Homepage {
    pub application: &'static str,
    pub user: Option<AuthenticatedPrincipal>,
}

/// `GET /`
pub async fn homepage(Actor(actor): Actor) -> Page<Homepage> {
    Page::new(Homepage {
        application: "todolist",
        user: actor.principal().cloned(),
    })
}
