use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tubely::{
    application::{
        media::{aspect_ratio_probe::AspectRatioProbe, fast_start::FastStartTranscoder},
        usecases::upload_video::{UploadVideoConfig, UploadVideoUseCase},
    },
    config::config_loader,
    infrastructure::{
        auth::jwt::JwtAccessTokenValidator,
        axum_http::http_serve,
        postgres::{postgres_connection, repositories::videos::VideoPostgres},
        process::tokio_process::TokioProcessRunner,
        storages::s3::{S3Config, S3Credentials, S3ObjectStorage},
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Server exited with error: {:?}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tubely::observability::init_observability("api")?;

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    config_loader::ensure_temp_dir(&dotenvy_env.upload)?;

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database)?;

    let storage = &dotenvy_env.storage;
    let mut s3_config = S3Config::new(storage.bucket.clone(), storage.region.clone());
    if let Some(endpoint) = &storage.endpoint {
        s3_config.endpoint = Some(endpoint.clone());
        s3_config.force_path_style = true;
    }
    if let (Some(access_key), Some(secret_key)) = (&storage.access_key, &storage.secret_key) {
        s3_config.credentials = Some(S3Credentials {
            access_key: access_key.clone(),
            secret_key: secret_key.clone(),
        });
    }
    let object_storage = S3ObjectStorage::new(&s3_config).await?;
    info!(bucket = %storage.bucket, "S3 client has been built");

    let runner = Arc::new(TokioProcessRunner);
    let upload_usecase = UploadVideoUseCase::new(
        Arc::new(VideoPostgres::new(Arc::new(postgres_pool))),
        Arc::new(object_storage),
        Arc::new(JwtAccessTokenValidator::new(&dotenvy_env.auth.jwt_secret)),
        AspectRatioProbe::new(runner.clone(), dotenvy_env.media_tools.ffprobe_path.clone()),
        FastStartTranscoder::new(runner, dotenvy_env.media_tools.ffmpeg_path.clone()),
        UploadVideoConfig {
            distribution_host: storage.distribution_host.clone(),
            temp_dir: dotenvy_env.upload.temp_dir.clone(),
            max_upload_bytes: dotenvy_env.upload.max_upload_bytes,
        },
    );

    http_serve::start(Arc::new(dotenvy_env), Arc::new(upload_usecase)).await?;

    Ok(())
}
