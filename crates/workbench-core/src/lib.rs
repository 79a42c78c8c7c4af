//! # workbench-core
//!
//! Core crate for Workbench. Contains configuration schemas, the tree and
//! file wire types shared by the server and the client, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Workbench crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
