/// Session cookie handling
///
/// The signed session token lives in the `todolist_session` cookie. The
/// [`Actor`] extractor validates it and reloads the user it names on every
/// request, so role changes and deleted accounts take effect immediately. A
/// missing, expired or tampered cookie, or one naming a user that no longer
/// exists, yields an anonymous context rather than an error, so public pages
/// keep working.
///
/// # Example
///
/// ```no_run
/// use todolist_api::session::Actor;
/// use todolist_shared::auth::authorization::{AccessChecker, Capability};
///
/// async fn handler(Actor(actor): Actor) -> &'static str {
///     if actor.is_granted(Capability::RoleAdmin) {
///         "admin"
///     } else {
///         "visitor"
///     }
/// }
/// ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use todolist_shared::auth::{
    context::SecurityContext,
    session::{create_session_token, validate_session_token, SessionClaims, SessionError},
};
use todolist_shared::models::user::User;
use tracing::debug;

use crate::{app::AppState, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "todolist_session";

/// Security context of the current request
///
/// Rejects only when the user lookup itself fails.
#[derive(Debug, Clone)]
pub struct Actor(pub SecurityContext);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(claims) = session_claims(&jar, state.session_secret()) else {
            return Ok(Actor(SecurityContext::Anonymous));
        };

        match User::find_by_id(&state.db, claims.sub).await? {
            Some(user) => Ok(Actor(SecurityContext::from(&user))),
            None => {
                debug!(user_id = claims.sub, "Session names a user that no longer exists");
                Ok(Actor(SecurityContext::Anonymous))
            }
        }
    }
}

/// Claims of a usable session cookie, if any
pub fn session_claims(jar: &CookieJar, secret: &str) -> Option<SessionClaims> {
    let cookie = jar.get(SESSION_COOKIE)?;

    match validate_session_token(cookie.value(), secret) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "Ignoring unusable session cookie");
            None
        }
    }
}

/// Opens a session for `user` by adding the session cookie to `jar`
pub fn open_session(jar: CookieJar, user: &User, state: &AppState) -> Result<CookieJar, SessionError> {
    let claims = SessionClaims::for_user(user, state.config.session_ttl());
    let token = create_session_token(&claims, state.session_secret())?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.api.production);

    Ok(jar.add(cookie))
}

/// Removes the session cookie
pub fn close_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
