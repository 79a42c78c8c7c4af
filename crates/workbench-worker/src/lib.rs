//! # workbench-worker
//!
//! The task gateway: an opaque pass-through to the external task runner.
//! Tasks are discovered from a results directory and new runs are spawned
//! as detached processes whose completion is observed only by polling.

pub mod gateway;
pub mod results;
pub mod runner;

pub use gateway::TaskGateway;
pub use results::ResultsTaskGateway;
pub use runner::ProcessRunner;
