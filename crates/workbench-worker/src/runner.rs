//! Detached runner process spawning.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use workbench_core::config::TasksConfig;
use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;

/// Spawns the external task runner with a description argument.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Program to execute.
    program: String,
    /// Arguments placed before the description.
    args: Vec<String>,
    /// Working directory, if any.
    working_dir: Option<PathBuf>,
}

impl ProcessRunner {
    /// Create a runner for `program args... <description>`.
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir,
        }
    }

    /// Create a runner from the tasks configuration section.
    pub fn from_config(config: &TasksConfig) -> Self {
        let working_dir = (!config.runner_cwd.is_empty()).then(|| PathBuf::from(&config.runner_cwd));
        Self::new(&config.runner_program, config.runner_args.clone(), working_dir)
    }

    /// Spawn the runner and return its process id without waiting.
    ///
    /// A background task collects the output and logs it once the process
    /// exits.
    pub fn spawn(&self, description: &str) -> AppResult<Option<u32>> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(description)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Failed to start task runner '{}'", self.program),
                e,
            )
        })?;
        let pid = child.id();

        tracing::info!(
            program = %self.program,
            pid = ?pid,
            "Task runner started in background"
        );

        let program = self.program.clone();
        let start = Instant::now();
        tokio::spawn(async move {
            match child.wait_with_output().await {
                Ok(output) => {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    tracing::info!(
                        program = %program,
                        exit_code = ?output.status.code(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        stdout = %stdout,
                        "Task runner finished"
                    );
                    if !stderr.is_empty() {
                        tracing::warn!(program = %program, stderr = %stderr, "Task runner stderr");
                    }
                }
                Err(e) => {
                    tracing::error!(program = %program, error = %e, "Task runner wait failed");
                }
            }
        });

        Ok(pid)
    }
}
