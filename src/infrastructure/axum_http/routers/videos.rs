use std::{io, sync::Arc};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::HeaderMap,
    routing::post,
};
use futures_util::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::upload_video::{UploadVideoError, UploadVideoUseCase, VideoDto},
    infrastructure::axum_http::auth::get_bearer_token,
};

const VIDEO_FIELD: &str = "video";

pub fn routes(usecase: Arc<UploadVideoUseCase>) -> Router {
    Router::new()
        .route("/:video_id/upload", post(upload_video))
        // The request body limit layer and the use case enforce the upload cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(usecase)
}

pub async fn upload_video(
    State(usecase): State<Arc<UploadVideoUseCase>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<VideoDto>, UploadVideoError> {
    let video_id = Uuid::parse_str(&video_id)
        .map_err(|_| UploadVideoError::BadRequest("Invalid ID".to_string()))?;

    let token = get_bearer_token(&headers).map_err(UploadVideoError::MissingToken)?;

    info!(%video_id, "videos: upload request received");

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadVideoError::BadRequest(format!("Unable to parse form file: {err}")))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let reader = StreamReader::new(field.map_err(io::Error::other));
        tokio::pin!(reader);

        let video = usecase
            .handle_upload(video_id, token, &content_type, reader)
            .await?;

        return Ok(Json(VideoDto::from(video)));
    }

    Err(UploadVideoError::BadRequest(
        "Unable to parse form file".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::{
            media::{aspect_ratio_probe::AspectRatioProbe, fast_start::FastStartTranscoder},
            usecases::upload_video::{DEFAULT_MAX_UPLOAD_BYTES, UploadVideoConfig},
        },
        domain::{
            entities::videos::VideoEntity,
            repositories::{
                access_tokens::MockAccessTokenValidator, object_storage::MockObjectStorageClient,
                process_runner::MockProcessRunner, videos::MockVideoRepository,
            },
        },
    };
    use axum::{
        body::Body,
        extract::FromRequest,
        http::{
            Request,
            header::{AUTHORIZATION, CONTENT_TYPE},
        },
    };
    use chrono::Utc;

    const BOUNDARY: &str = "tubely-test-boundary";

    fn usecase_with(
        repository: MockVideoRepository,
        validator: MockAccessTokenValidator,
        temp_dir: &std::path::Path,
    ) -> Arc<UploadVideoUseCase> {
        let mut storage = MockObjectStorageClient::new();
        storage.expect_put_object().never();
        let runner = Arc::new(MockProcessRunner::new());

        Arc::new(UploadVideoUseCase::new(
            Arc::new(repository),
            Arc::new(storage),
            Arc::new(validator),
            AspectRatioProbe::new(runner.clone(), "ffprobe".to_string()),
            FastStartTranscoder::new(runner, "ffmpeg".to_string()),
            UploadVideoConfig {
                distribution_host: "cdn.example.com".to_string(),
                temp_dir: temp_dir.to_path_buf(),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
        ))
    }

    async fn multipart_with(field_name: &str, content_type: &str) -> Multipart {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"boots.png\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             not really a video\r\n\
             --{BOUNDARY}--\r\n"
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/videos/upload")
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn malformed_video_id_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let usecase = usecase_with(
            MockVideoRepository::new(),
            MockAccessTokenValidator::new(),
            dir.path(),
        );

        let result = upload_video(
            State(usecase),
            Path("not-a-uuid".to_string()),
            bearer("token"),
            multipart_with("video", "video/mp4").await,
        )
        .await;

        assert!(matches!(result, Err(UploadVideoError::BadRequest(_))));
    }

    #[tokio::test]
    async fn missing_bearer_token_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let usecase = usecase_with(
            MockVideoRepository::new(),
            MockAccessTokenValidator::new(),
            dir.path(),
        );

        let result = upload_video(
            State(usecase),
            Path(Uuid::new_v4().to_string()),
            HeaderMap::new(),
            multipart_with("video", "video/mp4").await,
        )
        .await;

        match result {
            Err(err @ UploadVideoError::MissingToken(_)) => {
                assert_eq!(err.to_string(), "Couldn't find JWT")
            }
            other => panic!("expected missing token, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn form_without_video_field_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let usecase = usecase_with(
            MockVideoRepository::new(),
            MockAccessTokenValidator::new(),
            dir.path(),
        );

        let result = upload_video(
            State(usecase),
            Path(Uuid::new_v4().to_string()),
            bearer("token"),
            multipart_with("thumbnail", "image/png").await,
        )
        .await;

        assert!(matches!(result, Err(UploadVideoError::BadRequest(_))));
    }

    #[tokio::test]
    async fn field_content_type_is_passed_to_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let user_id = Uuid::new_v4();
        let video_id = Uuid::new_v4();

        let mut validator = MockAccessTokenValidator::new();
        validator.expect_validate().returning(move |_| Ok(user_id));

        let mut repository = MockVideoRepository::new();
        repository.expect_find_video_by_id().returning(move |id| {
            let now = Utc::now();
            let video = VideoEntity {
                id,
                created_at: now,
                updated_at: now,
                title: "Boots".to_string(),
                description: String::new(),
                thumbnail_url: None,
                video_url: None,
                user_id,
            };
            Box::pin(async move { Ok(Some(video)) })
        });

        let usecase = usecase_with(repository, validator, dir.path());

        let result = upload_video(
            State(usecase),
            Path(video_id.to_string()),
            bearer("token"),
            multipart_with("video", "image/png").await,
        )
        .await;

        match result {
            Err(UploadVideoError::BadRequest(message)) => assert_eq!(message, "Invalid file type"),
            other => panic!("expected bad request, got {other:?}"),
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
