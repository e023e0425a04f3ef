/// Login pipeline
///
/// A login attempt runs through four stages, each returning a `Result`:
///
/// 1. [`Credentials`] are extracted from the submitted form (infallible)
/// 2. [`lookup_principal`] resolves the username through a [`UserProvider`]
/// 3. [`verify_credentials`] checks the password through a [`PasswordEncoder`]
/// 4. [`on_authentication_success`] or [`on_authentication_failure`] builds the
///    notices and redirect target
///
/// Unknown usernames and wrong passwords fail with the same
/// [`AuthError::InvalidCredentials`], so the response never reveals whether
/// an account exists. Storage failures are reported separately as
/// [`AuthError::Backend`] and never reach the user as a login failure.
///
/// # Example
///
/// ```no_run
/// use todolist_shared::auth::credentials::Credentials;
/// use todolist_shared::auth::login::{attempt_login, LoginOutcome};
/// use todolist_shared::auth::password::Argon2Encoder;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let credentials = Credentials::new("anna", "secret");
///
/// match attempt_login(&pool, &Argon2Encoder, credentials).await? {
///     LoginOutcome::Authenticated(success) => println!("welcome {}", success.principal.username),
///     LoginOutcome::Rejected(failure) => println!("back to {}", failure.redirect_to.path()),
/// }
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use super::credentials::Credentials;
use super::notice::{messages, Notices};
use super::password::PasswordEncoder;
use crate::models::user::User;
use crate::route::Route;

/// Error type for the login pipeline
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown user or wrong password
    #[error("Identifiants invalides !")]
    InvalidCredentials,

    /// The user store could not be queried
    #[error("User lookup failed: {0}")]
    Backend(#[from] sqlx::Error),
}

impl AuthError {
    /// Message shown to the user on a failed login
    pub fn user_message(&self) -> &'static str {
        messages::INVALID_CREDENTIALS
    }
}

/// Resolves usernames to users
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn load_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
}

#[async_trait]
impl UserProvider for PgPool {
    async fn load_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        User::find_by_username(self, username).await
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub principal: User,
    pub notices: Notices,
    pub redirect_to: Route,
}

/// Result of a rejected login
#[derive(Debug, Clone)]
pub struct LoginFailure {
    /// Username to prefill on the login form
    pub last_username: String,
    pub notices: Notices,
    pub redirect_to: Route,
}

/// Terminal state of a login attempt
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Authenticated(LoginSuccess),
    Rejected(LoginFailure),
}

/// Finds the user named in the credentials
///
/// # Errors
///
/// `AuthError::InvalidCredentials` when no user matches, including for an
/// empty username.
pub async fn lookup_principal<P>(provider: &P, credentials: &Credentials) -> Result<User, AuthError>
where
    P: UserProvider + ?Sized,
{
    if credentials.username.is_empty() {
        debug!("Login attempt without username");
        return Err(AuthError::InvalidCredentials);
    }

    provider
        .load_user_by_username(&credentials.username)
        .await?
        .ok_or_else(|| {
            debug!(username = %credentials.username, "Login attempt for unknown user");
            AuthError::InvalidCredentials
        })
}

/// Checks the submitted password against the user's stored hash
pub fn verify_credentials<E>(
    encoder: &E,
    credentials: &Credentials,
    user: User,
) -> Result<User, AuthError>
where
    E: PasswordEncoder + ?Sized,
{
    if encoder.is_password_valid(&user, &credentials.password) {
        Ok(user)
    } else {
        debug!(user_id = user.id, "Login attempt with wrong password");
        Err(AuthError::InvalidCredentials)
    }
}

/// Builds the success response: one notice and a redirect to the homepage
pub fn on_authentication_success(principal: User) -> LoginSuccess {
    let mut notices = Notices::new();
    notices.success(messages::LOGIN_SUCCESS);

    LoginSuccess {
        principal,
        notices,
        redirect_to: Route::Homepage,
    }
}

/// Builds the failure response: the generic error notice and a redirect back
/// to the login form
pub fn on_authentication_failure(credentials: &Credentials, error: &AuthError) -> LoginFailure {
    let mut notices = Notices::new();
    notices.error(error.user_message());

    LoginFailure {
        last_username: credentials.username.clone(),
        notices,
        redirect_to: Route::Login,
    }
}

/// Runs lookup and verification
pub async fn authenticate<P, E>(
    provider: &P,
    encoder: &E,
    credentials: &Credentials,
) -> Result<User, AuthError>
where
    P: UserProvider + ?Sized,
    E: PasswordEncoder + ?Sized,
{
    let user = lookup_principal(provider, credentials).await?;
    verify_credentials(encoder, credentials, user)
}

/// Runs the whole pipeline for one submission
///
/// Credential failures become [`LoginOutcome::Rejected`]; only storage
/// errors are returned as `Err`.
pub async fn attempt_login<P, E>(
    provider: &P,
    encoder: &E,
    credentials: Credentials,
) -> Result<LoginOutcome, sqlx::Error>
where
    P: UserProvider + ?Sized,
    E: PasswordEncoder + ?Sized,
{
    match authenticate(provider, encoder, &credentials).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "User logged in");
            Ok(LoginOutcome::Authenticated(on_authentication_success(user)))
        }
        Err(AuthError::Backend(e)) => {
            warn!(error = %e, "User store unavailable during login");
            Err(e)
        }
        Err(e @ AuthError::InvalidCredentials) => {
            info!(username = %credentials.username, "Login rejected");
            Ok(LoginOutcome::Rejected(on_authentication_failure(&credentials, &e)))
        }
    }
}
