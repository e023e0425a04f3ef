//! # todolist API Server Library
//!
//! HTTP layer of the todolist application: form login with session cookies,
//! task and user management.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `response`: Page and redirect documents
//! - `routes`: Route handlers
//! - `session`: Session cookie and the `Actor` extractor

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod session;
