//! HTTP request handlers.

pub mod fs;
pub mod health;
pub mod reload;
pub mod tasks;
