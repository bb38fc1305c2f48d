use std::{io::SeekFrom, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::media::{
        aspect_ratio_probe::{AspectRatioProbe, ProbeError},
        fast_start::{FastStartTranscoder, TranscodeError},
    },
    domain::{
        entities::videos::VideoEntity,
        repositories::{
            access_tokens::AccessTokenValidator, object_storage::ObjectStorageClient,
            videos::VideoRepository,
        },
        value_objects::{
            asset_keys::AssetKey,
            media_types::{SUPPORTED_VIDEO_MEDIA_TYPE, parse_media_type},
        },
    },
};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1 << 30;

#[derive(Debug, Error)]
pub enum UploadVideoError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Couldn't find JWT")]
    MissingToken(#[source] anyhow::Error),

    #[error("Couldn't validate JWT")]
    Unauthorized(#[source] anyhow::Error),

    #[error("Not authorized to update this video")]
    Forbidden,

    #[error("Video {0} not found")]
    NotFound(Uuid),

    #[error("Couldn't find video")]
    Lookup(#[source] anyhow::Error),

    #[error("Upload exceeds the limit of {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Couldn't get the aspect ratio")]
    Probe(#[from] ProbeError),

    #[error("Error processing video")]
    Transcode(#[from] TranscodeError),

    #[error("Error uploading to object storage")]
    Storage(#[source] anyhow::Error),

    #[error("Couldn't update video")]
    Persistence(#[source] anyhow::Error),

    #[error("{context}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl UploadVideoError {
    fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| UploadVideoError::Io { context, source }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoDto {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

impl From<VideoEntity> for VideoDto {
    fn from(value: VideoEntity) -> Self {
        Self {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            title: value.title,
            description: value.description,
            thumbnail_url: value.thumbnail_url,
            video_url: value.video_url,
            user_id: value.user_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadVideoConfig {
    /// Host of the CDN distribution in front of the bucket.
    pub distribution_host: String,
    /// Directory for staged and processed files.
    pub temp_dir: PathBuf,
    pub max_upload_bytes: u64,
}

pub struct UploadVideoUseCase {
    video_repository: Arc<dyn VideoRepository + Send + Sync>,
    object_storage: Arc<dyn ObjectStorageClient + Send + Sync>,
    token_validator: Arc<dyn AccessTokenValidator + Send + Sync>,
    probe: AspectRatioProbe,
    transcoder: FastStartTranscoder,
    config: UploadVideoConfig,
}

impl UploadVideoUseCase {
    pub fn new(
        video_repository: Arc<dyn VideoRepository + Send + Sync>,
        object_storage: Arc<dyn ObjectStorageClient + Send + Sync>,
        token_validator: Arc<dyn AccessTokenValidator + Send + Sync>,
        probe: AspectRatioProbe,
        transcoder: FastStartTranscoder,
        config: UploadVideoConfig,
    ) -> Self {
        Self {
            video_repository,
            object_storage,
            token_validator,
            probe,
            transcoder,
            config,
        }
    }

    /// Stages, probes and fast-start processes the payload, stores it and records its URL
    /// on the video. Local files are removed on every exit path.
    pub async fn handle_upload<R>(
        &self,
        video_id: Uuid,
        auth_token: &str,
        content_type: &str,
        payload: R,
    ) -> Result<VideoEntity, UploadVideoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let user_id = self
            .token_validator
            .validate(auth_token)
            .map_err(UploadVideoError::Unauthorized)?;

        let mut video = self
            .video_repository
            .find_video_by_id(video_id)
            .await
            .map_err(UploadVideoError::Lookup)?
            .ok_or(UploadVideoError::NotFound(video_id))?;

        if video.user_id != user_id {
            warn!(%video_id, %user_id, owner_id = %video.user_id, "upload: user does not own video");
            return Err(UploadVideoError::Forbidden);
        }

        let media_type = parse_media_type(content_type)
            .map_err(|_| UploadVideoError::BadRequest("Invalid Content-Type".to_string()))?;
        if media_type != SUPPORTED_VIDEO_MEDIA_TYPE {
            return Err(UploadVideoError::BadRequest("Invalid file type".to_string()));
        }

        info!(%video_id, %user_id, "upload: staging payload");
        let staged = self.stage_payload(payload).await?;

        let aspect_ratio = self.probe.probe(staged.path()).await?;
        let processed = self.transcoder.process(staged.path()).await?;

        let processed_file = File::open(&processed)
            .await
            .map_err(UploadVideoError::io("Error opening processed file"))?;

        let asset_key = AssetKey::new(aspect_ratio.orientation_prefix(), &media_type);
        let object_key = asset_key.object_key();

        self.object_storage
            .put_object(object_key.clone(), processed_file, media_type.clone())
            .await
            .map_err(UploadVideoError::Storage)?;
        info!(%video_id, key = %object_key, %aspect_ratio, "upload: stored processed video");

        video.video_url = Some(asset_key.public_url(&self.config.distribution_host));
        video.updated_at = Utc::now();
        self.video_repository
            .update_video(video.clone())
            .await
            .map_err(UploadVideoError::Persistence)?;

        info!(%video_id, %user_id, "upload: video url updated");
        Ok(video)
    }

    async fn stage_payload<R>(&self, payload: R) -> Result<NamedTempFile, UploadVideoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let staged = tempfile::Builder::new()
            .prefix("tubely-upload-")
            .suffix(".mp4")
            .tempfile_in(&self.config.temp_dir)
            .map_err(UploadVideoError::io("Can't create a file"))?;

        let handle = staged
            .as_file()
            .try_clone()
            .map_err(UploadVideoError::io("Can't create a file"))?;
        let mut file = File::from_std(handle);

        let limit = self.config.max_upload_bytes;
        let mut limited = payload.take(limit.saturating_add(1));
        let written = tokio::io::copy(&mut limited, &mut file)
            .await
            .map_err(UploadVideoError::io("Error saving file"))?;
        if written > limit {
            return Err(UploadVideoError::PayloadTooLarge { limit });
        }

        file.flush()
            .await
            .map_err(UploadVideoError::io("Error saving file"))?;
        file.seek(SeekFrom::Start(0))
            .await
            .map_err(UploadVideoError::io("Error saving file"))?;

        Ok(staged)
    }
}
