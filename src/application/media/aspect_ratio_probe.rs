use std::{path::Path, sync::Arc};

use thiserror::Error;
use tracing::{debug, error};

use crate::domain::{
    repositories::process_runner::ProcessRunner, value_objects::aspect_ratios::AspectRatio,
};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("ffprobe failed: {0}")]
    Execution(#[source] anyhow::Error),

    #[error("ffprobe exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("failed to parse ffprobe output")]
    Parse(#[source] anyhow::Error),
}

pub struct AspectRatioProbe {
    runner: Arc<dyn ProcessRunner + Send + Sync>,
    ffprobe_path: String,
}

impl AspectRatioProbe {
    pub fn new(runner: Arc<dyn ProcessRunner + Send + Sync>, ffprobe_path: String) -> Self {
        Self {
            runner,
            ffprobe_path,
        }
    }

    pub async fn probe(&self, file_path: &Path) -> Result<AspectRatio, ProbeError> {
        let args = vec![
            "-v".into(),
            "error".into(),
            "-print_format".into(),
            "json".into(),
            "-show_streams".into(),
            file_path.as_os_str().to_owned(),
        ];

        let output = self
            .runner
            .run(self.ffprobe_path.clone(), args)
            .await
            .map_err(ProbeError::Execution)?;

        if !output.success {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            error!(
                file = %file_path.display(),
                status = %output.status,
                stderr = %stderr,
                "ffprobe failed"
            );
            return Err(ProbeError::Exit {
                status: output.status,
                stderr,
            });
        }

        let aspect_ratio = AspectRatio::from_probe_json(&output.stdout).map_err(ProbeError::Parse)?;
        debug!(file = %file_path.display(), %aspect_ratio, "probed aspect ratio");

        Ok(aspect_ratio)
    }
}
