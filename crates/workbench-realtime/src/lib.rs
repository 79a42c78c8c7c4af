//! # workbench-realtime
//!
//! Push signalling for connected browsers:
//!
//! - A broadcast hub fanning reload events out to every subscriber
//! - A filesystem watcher on the static asset directory feeding the hub

pub mod hub;
pub mod watcher;

pub use hub::{ReloadEvent, ReloadHub};
pub use watcher::AssetWatcher;
