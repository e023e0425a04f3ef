/// Route handlers
///
/// - `default`: homepage
/// - `health`: health check endpoint
/// - `security`: login form, login check and logout
/// - `tasks`: task list and task forms
/// - `users`: user management

pub mod default;
pub mod health;
pub mod security;
pub mod tasks;
pub mod users;
