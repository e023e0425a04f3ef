/// Task model and database operations
///
/// A task is a titled note that can be marked done. Tasks created before user
/// accounts existed have no owner; tasks created through the API are owned by
/// the principal that created them. Ownership never changes afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY CHECK (id > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     is_done BOOLEAN NOT NULL DEFAULT FALSE,
///     user_id BIGINT REFERENCES users(id) ON DELETE SET NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todolist_shared::models::task::{CreateTask, Task};
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Title".to_string(),
///     content: "The content of the task".to_string(),
///     owner_id: Some(1),
/// }).await?;
///
/// // Mark it done
/// Task::toggle(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::user::UserId;

/// Database identifier of a task
pub type TaskId = i64;

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// When the task was created (immutable)
    pub created_at: DateTime<Utc>,

    /// Short title
    pub title: String,

    /// Free-form content
    pub content: String,

    /// Whether the task has been marked done
    pub is_done: bool,

    /// Owner of the task (None for anonymous tasks)
    #[sqlx(rename = "user_id")]
    pub owner_id: Option<UserId>,
}

impl Task {
    /// Identity of the owner, if the task is bound to a persisted user
    ///
    /// User ids are strictly positive, so a non-positive owner id is not a
    /// persisted identity and is reported as `None`, same as a missing owner.
    pub fn owner_identity(&self) -> Option<UserId> {
        self.owner_id.filter(|id| *id > 0)
    }

    /// Whether the task is anonymous (not bound to a persisted owner)
    pub fn is_anonymous(&self) -> bool {
        self.owner_identity().is_none()
    }
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task content
    pub content: String,

    /// Creator, becomes the owner
    pub owner_id: Option<UserId>,
}

/// Input for editing a task
///
/// Ownership and creation date are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New content
    pub content: Option<String>,
}

impl Task {
    /// Creates a new task, not done
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, content, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, title, content, is_done, user_id
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: TaskId) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, created_at, title, content, is_done, user_id
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, created_at, title, content, is_done, user_id
            FROM tasks
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks owned by a user, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: UserId) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, created_at, title, content, is_done, user_id
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates title and/or content
    ///
    /// # Returns
    ///
    /// The updated task if found, None otherwise
    pub async fn update(
        pool: &PgPool,
        id: TaskId,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                content = COALESCE($3, content)
            WHERE id = $1
            RETURNING id, created_at, title, content, is_done, user_id
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Flips the done flag
    ///
    /// # Returns
    ///
    /// The task with its new state, None if it doesn't exist
    pub async fn toggle(pool: &PgPool, id: TaskId) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET is_done = NOT is_done
            WHERE id = $1
            RETURNING id, created_at, title, content, is_done, user_id
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// # Returns
    ///
    /// True if the task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: TaskId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
