//! # workbench-client
//!
//! Client-side state for the workspace browser, free of any rendering
//! concern:
//!
//! - [`TreeStateMachine`]: the last tree snapshot, collapsed directories,
//!   level stepping and the visible row walk
//! - [`OpenDocumentSet`]: open files with persisted content and drafts
//! - [`WorkspaceBackend`]: the network boundary, implemented over HTTP by
//!   [`HttpBackend`]
//! - [`Workspace`]: the single coordinator owning all of the above and
//!   notifying observers through [`WorkspaceEvent`]s

pub mod backend;
pub mod documents;
pub mod http;
pub mod tree_state;
pub mod workspace;

pub use backend::WorkspaceBackend;
pub use documents::{OpenDocument, OpenDocumentSet, SaveOutcome};
pub use http::HttpBackend;
pub use tree_state::{ExpansionState, TreeStateMachine, VisibleRow, VisibleRows};
pub use workspace::{Selection, Workspace, WorkspaceEvent};
