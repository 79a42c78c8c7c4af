//! # workbench-storage
//!
//! Everything that touches the served directory: the [`PathGuard`]
//! sandbox boundary, the [`TreeBuilder`] snapshot walker, and the
//! [`FileStore`] read/write/delete/mkdir primitives built on top of both.

pub mod guard;
pub mod store;
pub mod tree;

pub use guard::PathGuard;
pub use store::{ChildEntry, FileStore, StoreLimits};
pub use tree::TreeBuilder;
