use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use super::config_model::{Auth, Database, DotEnvyConfig, MediaTools, Server, Storage, Upload};
use crate::application::usecases::upload_video::DEFAULT_MAX_UPLOAD_BYTES;

const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 600;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup so it can be exercised without touching the process
/// environment.
pub fn from_lookup<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let required = |key: &str| optional(key).with_context(|| format!("{key} is invalid"));

    let server = Server {
        port: required("SERVER_PORT")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        timeout: match optional("SERVER_TIMEOUT") {
            Some(raw) => raw.parse().context("SERVER_TIMEOUT is invalid")?,
            None => DEFAULT_SERVER_TIMEOUT_SECS,
        },
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().context("DATABASE_MAX_CONNECTIONS is invalid")?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        },
    };

    let auth = Auth {
        jwt_secret: required("JWT_SECRET")?,
    };

    let access_key = optional("S3_ACCESS_KEY");
    let secret_key = optional("S3_SECRET_KEY");
    if access_key.is_some() != secret_key.is_some() {
        bail!("S3_ACCESS_KEY and S3_SECRET_KEY must be set together");
    }

    let storage = Storage {
        bucket: required("S3_BUCKET")?,
        region: required("S3_REGION")?,
        endpoint: optional("S3_ENDPOINT"),
        access_key,
        secret_key,
        distribution_host: required("S3_CF_DISTRIBUTION")?
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string(),
    };

    let upload = Upload {
        temp_dir: optional("UPLOAD_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir),
        max_upload_bytes: match optional("UPLOAD_MAX_BYTES") {
            Some(raw) => raw.parse().context("UPLOAD_MAX_BYTES is invalid")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        },
    };

    let media_tools = MediaTools {
        ffprobe_path: optional("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
        ffmpeg_path: optional("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        storage,
        upload,
        media_tools,
    })
}

/// Creates the staging directory if it does not exist yet.
pub fn ensure_temp_dir(upload: &Upload) -> Result<()> {
    std::fs::create_dir_all(&upload.temp_dir).with_context(|| {
        format!(
            "failed to create upload temp dir {}",
            upload.temp_dir.display()
        )
    })
}
