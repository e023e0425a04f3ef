/// Database models for todolist
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (principals) with roles
/// - `task`: Tasks, optionally owned by a user
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::user::{User, CreateUser, Role};
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "john".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     email: "john@doe.com".to_string(),
///     roles: vec![Role::User],
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
