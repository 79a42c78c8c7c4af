//! Integration tests for the Workbench server and client.

mod client_test;
mod fs_test;
mod helpers;
mod tasks_test;
