//! HTTP API for the Tollgate backend
//!
//! Routes, request DTOs, error mapping and middleware over the core services.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppSettings, AppState};
