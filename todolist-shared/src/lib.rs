//! # todolist Shared Library
//!
//! This crate contains the domain types and the authentication/authorization
//! flow used by the todolist API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users and tasks)
//! - `db`: Connection pool and migrations
//! - `auth`: Login pipeline, password hashing, session tokens, authorization
//! - `route`: Named routes used as redirect targets

pub mod auth;
pub mod db;
pub mod models;
pub mod route;

/// Current version of the todolist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
