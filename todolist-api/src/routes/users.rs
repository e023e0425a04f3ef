/// User management endpoints
///
/// # Endpoints
///
/// - `GET /users` - List users (administrators)
/// - `POST /users/create` - Register an account (public, role picked by administrators only)
/// - `POST /users/:id/edit` - Edit an account (administrators)
///
/// Passwords are hashed with Argon2id before storage and never returned.

use axum::{
    extract::{Path, State},
    Form,
};
use serde::Deserialize;
use todolist_shared::auth::{
    authorization::{require_capability, AccessChecker, Capability},
    notice::messages,
    password::{Argon2Encoder, PasswordEncoder},
};
use todolist_shared::models::user::{CreateUser, Role, UpdateUser, User, UserId};
use todolist_shared::route::Route;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{Page, PageRedirect},
    session::Actor,
};

/// Account form, shared by creation and edition
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UserForm {
    #[validate(length(min = 1, max = 25, message = "Vous devez saisir un nom d'utilisateur."))]
    pub username: String,

    #[validate(length(min = 1, message = "Vous devez saisir un mot de passe."))]
    pub password: String,

    #[validate(must_match(
        other = "password",
        message = "Les deux mots de passe doivent correspondre."
    ))]
    pub password_confirmation: String,

    #[validate(
        email(message = "Le format de l'adresse n'est pas correct."),
        length(max = 60, message = "L'adresse email est trop longue.")
    )]
    pub email: String,

    /// Defaults to `ROLE_USER`
    pub role: Option<Role>,
}

impl UserForm {
    fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self
        }
    }

    fn role(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }
}

/// `GET /users`
pub async fn list_users(
    State(state): State<AppState>,
    Actor(actor): Actor,
) -> ApiResult<Page<Vec<User>>> {
    require_capability(&actor, Capability::RoleAdmin)?;

    let users = User::list(&state.db).await?;
    Ok(Page::new(users))
}

/// `POST /users/create`
///
/// Open to everyone, but only administrators may pick the role; other
/// callers always register a `ROLE_USER` account.
pub async fn create_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Form(form): Form<UserForm>,
) -> ApiResult<PageRedirect> {
    let form = form.normalized();
    form.validate()?;

    let role = if actor.is_granted(Capability::RoleAdmin) {
        form.role()
    } else {
        if form.role() != Role::User {
            warn!(requested = %form.role(), "Ignoring role requested by a non-administrator");
        }
        Role::User
    };
    let password_hash = Argon2Encoder.encode_password(&form.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: form.username,
            password_hash,
            email: form.email,
            roles: vec![role],
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, role = %role, "User created");

    Ok(PageRedirect::to(Route::UserList).success(messages::USER_CREATED))
}

/// `POST /users/:id/edit`
pub async fn edit_user(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<UserId>,
    Form(form): Form<UserForm>,
) -> ApiResult<PageRedirect> {
    require_capability(&actor, Capability::RoleAdmin)?;

    let form = form.normalized();
    form.validate()?;

    let role = form.role();
    let password_hash = Argon2Encoder.encode_password(&form.password)?;

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            username: Some(form.username),
            password_hash: Some(password_hash),
            email: Some(form.email),
            roles: Some(vec![role]),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User {} not found", id)))?;

    info!(user_id = user.id, role = %role, "User updated");

    Ok(PageRedirect::to(Route::UserList).success(messages::USER_UPDATED))
}
