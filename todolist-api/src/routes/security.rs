/// Login and logout
///
/// # Endpoints
///
/// - `GET /login` - Login page data
/// - `POST /login` - Login check (`_username`, `_password`, url-encoded)
/// - `GET /logout` - Clears the session
///
/// A login check always answers with a redirect. Success goes to `/` with
/// "Connexion réussie !" and sets the session cookie; failure goes back to
/// `/login` with the generic "Identifiants invalides !" notice and the
/// submitted username.

use axum::{
    extract::{Query, State},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use todolist_shared::auth::{
    context::AuthenticatedPrincipal,
    credentials::{Credentials, LoginForm},
    login::{attempt_login, LoginOutcome},
    password::Argon2Encoder,
};
use todolist_shared::route::Route;
use tracing::info;

use crate::{
    app::AppState,
    error::ApiResult,
    response::{Page, PageRedirect},
    session::{close_session, open_session, Actor},
};

/// Query string of the login page
#[derive(Debug, Default, Deserialize)]
pub struct LoginPageQuery {
    pub last_username: Option<String>,
}

/// Login page data
#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub last_username: String,
    pub user: Option<AuthenticatedPrincipal>,
}

/// `GET /login`
pub async fn login_page(
    Actor(actor): Actor,
    Query(query): Query<LoginPageQuery>,
) -> Page<LoginPage> {
    Page::new(LoginPage {
        last_username: query.last_username.unwrap_or_default(),
        user: actor.principal().cloned(),
    })
}

/// `POST /login`
pub async fn login_check(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(CookieJar, PageRedirect)> {
    let credentials = Credentials::from(form);

    match attempt_login(&state.db, &Argon2Encoder, credentials).await? {
        LoginOutcome::Authenticated(success) => {
            let jar = open_session(jar, &success.principal, &state)?;
            let redirect = PageRedirect::to(success.redirect_to).with_notices(success.notices);
            Ok((jar, redirect))
        }
        LoginOutcome::Rejected(failure) => {
            let redirect = PageRedirect::to(failure.redirect_to)
                .with_notices(failure.notices)
                .with_last_username(failure.last_username);
            Ok((jar, redirect))
        }
    }
}

/// `GET /logout`
pub async fn logout(Actor(actor): Actor, jar: CookieJar) -> (CookieJar, PageRedirect) {
    if let Some(principal) = actor.principal() {
        info!(user_id = principal.id, "User logged out");
    }

    (close_session(jar), PageRedirect::to(Route::Login))
}
