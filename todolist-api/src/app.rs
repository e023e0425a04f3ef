/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use todolist_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = todolist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Signing key for session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET  /                    homepage
/// GET  /health              health check
/// GET  /login               login page
/// POST /login               login check
/// GET  /logout              logout
/// GET  /tasks               task list
/// POST /tasks/create        create task        (signed in)
/// POST /tasks/:id/edit      edit task          (signed in)
/// POST /tasks/:id/toggle    toggle task
/// POST /tasks/:id/delete    delete task        (signed in, ownership rule)
/// GET  /users               user list          (admin)
/// POST /users/create        create user
/// POST /users/:id/edit      edit user          (admin)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Response compression (gzip, brotli)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let security_routes = Router::new()
        .route(
            "/login",
            get(routes::security::login_page).post(routes::security::login_check),
        )
        .route("/logout", get(routes::security::logout));

    let task_routes = Router::new()
        .route("/tasks", get(routes::tasks::list_tasks))
        .route("/tasks/create", post(routes::tasks::create_task))
        .route("/tasks/:id/edit", post(routes::tasks::edit_task))
        .route("/tasks/:id/toggle", post(routes::tasks::toggle_task))
        .route("/tasks/:id/delete", post(routes::tasks::delete_task));

    let user_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/users/create", post(routes::users::create_user))
        .route("/users/:id/edit", post(routes::users::edit_user));

    Router::new()
        .route("/", get(routes::default::homepage))
        .route("/health", get(routes::health::health_check))
        .merge(security_routes)
        .merge(task_routes)
        .merge(user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials are needed for the session cookie
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
