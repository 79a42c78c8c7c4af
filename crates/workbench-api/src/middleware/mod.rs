//! Tower middleware for the HTTP layer.

pub mod cors;
pub mod logging;
