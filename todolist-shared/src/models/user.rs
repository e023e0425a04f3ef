/// User model and database operations
///
/// A user is the principal that signs in through the login form. Roles are
/// stored as their string tags (`ROLE_USER`, `ROLE_ADMIN`) and exposed through
/// the closed [`Role`] enum.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY CHECK (id > 0),
///     username VARCHAR(25) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL,
///     email VARCHAR(60) NOT NULL UNIQUE,
///     roles TEXT[] NOT NULL DEFAULT ARRAY['ROLE_USER']
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::user::{CreateUser, Role, User};
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "john".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     email: "john@doe.com".to_string(),
///     roles: vec![Role::User],
/// }).await?;
///
/// let found = User::find_by_username(&pool, "john").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

/// Database identifier of a user
///
/// Always strictly positive for persisted rows.
pub type UserId = i64;

/// Role tags a user can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular account
    #[serde(rename = "ROLE_USER")]
    User,

    /// Administrator: manages users and anonymous tasks
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Role tag as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User model representing an account
///
/// The password column holds an Argon2id PHC string, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Login name, unique across users
    pub username: String,

    /// Argon2id password hash
    #[sqlx(rename = "password")]
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Email address, unique across users
    pub email: String,

    /// Role tags in assignment order
    pub roles: Vec<String>,
}

impl User {
    /// Roles held by this user
    ///
    /// Unknown tags in the database are ignored.
    pub fn role_set(&self) -> Vec<Role> {
        self.roles
            .iter()
            .filter_map(|r| r.parse().ok())
            .collect()
    }

    /// Checks role membership
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    /// First assigned role, used for display
    pub fn primary_role(&self) -> Option<Role> {
        self.role_set().into_iter().next()
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Email address
    pub email: String,

    /// Roles to assign; an empty list falls back to `ROLE_USER`
    pub roles: Vec<Role>,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New login name
    pub username: Option<String>,

    /// New password hash
    pub password_hash: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New role list (ignored when empty)
    pub roles: Option<Vec<Role>>,
}

fn role_tags(roles: &[Role]) -> Vec<String> {
    if roles.is_empty() {
        return vec![Role::User.as_str().to_string()];
    }
    roles.iter().map(|r| r.as_str().to_string()).collect()
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username or email already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, email, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password, email, roles
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.email)
        .bind(role_tags(&data.roles))
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, roles
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by login name
    ///
    /// Lookup is exact (case-sensitive), matching the unique constraint.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use todolist_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(user) = User::find_by_username(&pool, "john").await? {
    ///     println!("Found user: {}", user.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, roles
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated.
    ///
    /// # Returns
    ///
    /// The updated user if found, None if user doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: UserId,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let roles = data
            .roles
            .filter(|r| !r.is_empty())
            .map(|r| role_tags(&r));

        // Build dynamic update query based on which fields are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        if data.username.is_some() {
            bind_count += 1;
            assignments.push(format!("username = ${}", bind_count));
        }
        if data.password_hash.is_some() {
            bind_count += 1;
            assignments.push(format!("password = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            assignments.push(format!("email = ${}", bind_count));
        }
        if roles.is_some() {
            bind_count += 1;
            assignments.push(format!("roles = ${}", bind_count));
        }

        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE users SET {} WHERE id = $1 RETURNING id, username, password, email, roles",
            assignments.join(", ")
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(roles) = roles {
            q = q.bind(roles);
        }

        let user = q.fetch_optional(pool).await?;

        Ok(user)
    }

    /// Deletes a user by ID
    ///
    /// Tasks owned by the user become anonymous (`ON DELETE SET NULL`).
    ///
    /// # Returns
    ///
    /// True if user was deleted, false if user didn't exist
    pub async fn delete(pool: &PgPool, id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all users ordered by username
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, email, roles
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
