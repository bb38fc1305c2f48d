use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub storage: Storage,
    pub upload: Upload,
    pub media_tools: MediaTools,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// Seconds before an in-flight request is aborted.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct Storage {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub distribution_host: String,
}

#[derive(Debug, Clone)]
pub struct Upload {
    pub temp_dir: PathBuf,
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct MediaTools {
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
}
