/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - List tasks (public)
/// - `POST /tasks/create` - Create a task owned by the current user
/// - `POST /tasks/:id/edit` - Edit title and content
/// - `POST /tasks/:id/toggle` - Mark done / not done
/// - `POST /tasks/:id/delete` - Delete, subject to the ownership rule
///
/// Forms are url-encoded. Successful submissions redirect to `/tasks`.

use axum::{
    extract::{Path, State},
    Form,
};
use serde::Deserialize;
use todolist_shared::auth::{
    authorization::{authorize_task_deletion, require_capability, AuthzError, Capability},
    notice::messages,
};
use todolist_shared::models::task::{CreateTask, Task, TaskId, UpdateTask};
use todolist_shared::route::Route;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{Page, PageRedirect},
    session::Actor,
};

/// Task form
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TaskForm {
    #[validate(length(min = 1, max = 255, message = "Vous devez saisir un titre."))]
    pub title: String,

    #[validate(length(min = 1, message = "Vous devez saisir du contenu."))]
    pub content: String,
}

impl TaskForm {
    /// Trims both fields so whitespace-only input fails validation
    fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        }
    }
}

async fn load_task(state: &AppState, id: TaskId) -> ApiResult<Task> {
    Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))
}

/// `GET /tasks`
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Page<Vec<Task>>> {
    let tasks = Task::list(&state.db).await?;
    Ok(Page::new(tasks))
}

/// `POST /tasks/create`
pub async fn create_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Form(form): Form<TaskForm>,
) -> ApiResult<PageRedirect> {
    require_capability(&actor, Capability::AuthenticatedFully)?;

    let form = form.normalized();
    form.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: form.title,
            content: form.content,
            owner_id: actor.principal().map(|p| p.id),
        },
    )
    .await?;

    info!(task_id = task.id, owner_id = ?task.owner_id, "Task created");

    Ok(PageRedirect::to(Route::TaskList).success(messages::TASK_CREATED))
}

/// `POST /tasks/:id/edit`
pub async fn edit_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<TaskId>,
    Form(form): Form<TaskForm>,
) -> ApiResult<PageRedirect> {
    require_capability(&actor, Capability::AuthenticatedFully)?;

    let form = form.normalized();
    form.validate()?;

    Task::update(
        &state.db,
        id,
        UpdateTask {
            title: Some(form.title),
            content: Some(form.content),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    info!(task_id = id, "Task updated");

    Ok(PageRedirect::to(Route::TaskList).success(messages::TASK_UPDATED))
}

/// `POST /tasks/:id/toggle`
pub async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<PageRedirect> {
    let task = Task::toggle(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task {} not found", id)))?;

    info!(task_id = id, is_done = task.is_done, "Task toggled");

    Ok(PageRedirect::to(Route::TaskList)
        .success(messages::task_toggled(&task.title, task.is_done)))
}

/// `POST /tasks/:id/delete`
///
/// Anonymous callers are rejected outright. For signed-in users a refused
/// deletion is not an error: the task stays and the redirect carries an
/// error notice.
pub async fn delete_task(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<TaskId>,
) -> ApiResult<PageRedirect> {
    require_capability(&actor, Capability::AuthenticatedFully)?;

    let task = load_task(&state, id).await?;
    let redirect = PageRedirect::to(Route::TaskList);

    match authorize_task_deletion(&actor, &task) {
        Ok(()) => {
            Task::delete(&state.db, task.id).await?;
            info!(task_id = task.id, "Task deleted");
            Ok(redirect.success(messages::TASK_DELETED))
        }
        Err(AuthzError::AuthorizationDenied) => {
            warn!(task_id = task.id, owner_id = ?task.owner_id, "Task deletion refused");
            Ok(redirect.error(messages::TASK_DELETE_DENIED))
        }
        Err(e) => Err(e.into()),
    }
}
