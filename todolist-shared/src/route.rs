//! Named application routes used as redirect targets.

use serde::Serialize;

use crate::models::task::TaskId;
use crate::models::user::UserId;

/// A named route of the web application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Landing page
    Homepage,
    Login,
    Logout,
    TaskList,
    TaskCreate,
    TaskEdit(TaskId),
    TaskToggle(TaskId),
    TaskDelete(TaskId),
    UserList,
    UserCreate,
    UserEdit(UserId),
}

impl Route {
    /// URL path of the route
    pub fn path(&self) -> String {
        match self {
            Route::Homepage => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Logout => "/logout".to_string(),
            Route::TaskList => "/tasks".to_string(),
            Route::TaskCreate => "/tasks/create".to_string(),
            Route::TaskEdit(id) => format!("/tasks/{}/edit", id),
            Route::TaskToggle(id) => format!("/tasks/{}/toggle", id),
            Route::TaskDelete(id) => format!("/tasks/{}/delete", id),
            Route::UserList => "/users".to_string(),
            Route::UserCreate => "/users/create".to_string(),
            Route::UserEdit(id) => format!("/users/{}/edit", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Homepage.path(), "/");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::TaskDelete(12).path(), "/tasks/12/delete");
        assert_eq!(Route::UserEdit(3).path(), "/users/3/edit");
    }
}
