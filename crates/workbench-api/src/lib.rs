//! # workbench-api
//!
//! HTTP API layer for Workbench built on Axum.
//!
//! Provides the `/api` file, tree, root-selection and task endpoints, the
//! reload event stream, static asset serving, middleware (CORS, logging)
//! and the mapping of domain errors onto HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
