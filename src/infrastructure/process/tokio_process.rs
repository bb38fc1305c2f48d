use std::{ffi::OsString, time::Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::repositories::process_runner::{ProcessOutput, ProcessRunner};

/// Spawns the program with `tokio::process` and waits for it to exit.
#[derive(Debug, Default, Clone)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: String, args: Vec<OsString>) -> Result<ProcessOutput> {
        let started = Instant::now();

        let output = Command::new(&program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))?;

        debug!(
            program = %program,
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "external process finished"
        );

        Ok(ProcessOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
