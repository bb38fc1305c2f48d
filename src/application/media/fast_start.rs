use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::TempPath;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::repositories::process_runner::ProcessRunner;

pub const PROCESSING_SUFFIX: &str = ".processing.mp4";

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("ffmpeg failed: {0}")]
    Execution(#[source] anyhow::Error),

    #[error("ffmpeg failed: {status}, {stderr}")]
    Exit { status: String, stderr: String },
}

/// Rewrites a video with its moov atom up front so playback can start before the download
/// finishes. Streams are copied, not re-encoded.
pub struct FastStartTranscoder {
    runner: Arc<dyn ProcessRunner + Send + Sync>,
    ffmpeg_path: String,
}

impl FastStartTranscoder {
    pub fn new(runner: Arc<dyn ProcessRunner + Send + Sync>, ffmpeg_path: String) -> Self {
        Self {
            runner,
            ffmpeg_path,
        }
    }

    pub fn output_path_for(input: &Path) -> PathBuf {
        let mut output = input.as_os_str().to_owned();
        output.push(PROCESSING_SUFFIX);
        PathBuf::from(output)
    }

    /// Returns the processed file; it is removed when the returned path is dropped.
    pub async fn process(&self, input: &Path) -> Result<TempPath, TranscodeError> {
        // Owned before ffmpeg runs so a partial output is removed if it fails.
        let output_path = TempPath::from_path(Self::output_path_for(input));

        let args: Vec<OsString> = vec![
            "-i".into(),
            input.as_os_str().to_owned(),
            "-c".into(),
            "copy".into(),
            "-movflags".into(),
            "faststart".into(),
            "-f".into(),
            "mp4".into(),
            output_path.as_os_str().to_owned(),
        ];

        let output = self
            .runner
            .run(self.ffmpeg_path.clone(), args)
            .await
            .map_err(TranscodeError::Execution)?;

        if !output.success {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            error!(
                input = %input.display(),
                status = %output.status,
                stderr = %stderr,
                "ffmpeg fast-start processing failed"
            );
            return Err(TranscodeError::Exit {
                status: output.status,
                stderr,
            });
        }

        info!(
            input = %input.display(),
            output = %output_path.display(),
            "processed video for fast start"
        );

        Ok(output_path)
    }
}
