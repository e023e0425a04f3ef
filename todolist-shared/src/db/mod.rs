/// Database layer for todolist
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded sqlx migrations
///
/// Models live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
