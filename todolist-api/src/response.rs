//! Response documents.
//!
//! Pages render as JSON `{ "data": ..., "notices": [...] }`. Form handlers
//! answer with a [`PageRedirect`]: `303 See Other`, a `Location` header and a
//! JSON body carrying the notices produced by the request.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use todolist_shared::auth::notice::Notices;
use todolist_shared::route::Route;

/// A rendered page
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: T,
    pub notices: Notices,
}

impl<T: Serialize> Page<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            notices: Notices::new(),
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Redirect to a named route after a form submission
#[derive(Debug, Clone, Serialize)]
pub struct PageRedirect {
    pub redirect: String,
    pub notices: Notices,

    /// Username to prefill on the login form after a failed attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_username: Option<String>,
}

impl PageRedirect {
    pub fn to(route: Route) -> Self {
        Self {
            redirect: route.path(),
            notices: Notices::new(),
            last_username: None,
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.notices.success(message);
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.notices.error(message);
        self
    }

    pub fn with_last_username(mut self, username: impl Into<String>) -> Self {
        self.last_username = Some(username.into());
        self
    }
}

impl IntoResponse for PageRedirect {
    fn into_response(self) -> Response {
        let location = HeaderValue::from_str(&self.redirect)
            .unwrap_or_else(|_| HeaderValue::from_static("/"));

        (StatusCode::SEE_OTHER, [(header::LOCATION, location)], Json(self)).into_response()
    }
}
