use std::ffi::OsString;

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub status: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs an external program to completion and captures its output.
#[async_trait]
#[automock]
pub trait ProcessRunner {
    async fn run(&self, program: String, args: Vec<OsString>) -> Result<ProcessOutput>;
}
