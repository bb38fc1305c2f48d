use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::application::usecases::upload_video::UploadVideoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl UploadVideoError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadVideoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            UploadVideoError::MissingToken(_) | UploadVideoError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            UploadVideoError::Forbidden => StatusCode::FORBIDDEN,
            UploadVideoError::NotFound(_) => StatusCode::NOT_FOUND,
            UploadVideoError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadVideoError::Lookup(_)
            | UploadVideoError::Probe(_)
            | UploadVideoError::Transcode(_)
            | UploadVideoError::Storage(_)
            | UploadVideoError::Persistence(_)
            | UploadVideoError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadVideoError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Display strings are client-safe; causes only go to the log.
        if status.is_server_error() {
            error!(error = ?self, "upload failed");
        } else {
            warn!(error = ?self, status = status.as_u16(), "upload rejected");
        }

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::media::fast_start::TranscodeError;
    use uuid::Uuid;

    async fn body_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn maps_kinds_to_status_codes() {
        let cases = [
            (UploadVideoError::BadRequest("Invalid ID".into()), StatusCode::BAD_REQUEST),
            (
                UploadVideoError::MissingToken(anyhow::anyhow!("no header")),
                StatusCode::UNAUTHORIZED,
            ),
            (
                UploadVideoError::Unauthorized(anyhow::anyhow!("expired")),
                StatusCode::UNAUTHORIZED,
            ),
            (UploadVideoError::Forbidden, StatusCode::FORBIDDEN),
            (UploadVideoError::NotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                UploadVideoError::PayloadTooLarge { limit: 1 << 30 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                UploadVideoError::Storage(anyhow::anyhow!("AccessDenied")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "{err:?}");
        }
    }

    #[tokio::test]
    async fn server_errors_do_not_leak_their_cause() {
        let err = UploadVideoError::Transcode(TranscodeError::Exit {
            status: "exit status: 1".to_string(),
            stderr: "/var/tmp/secret-path.mp4: moov atom not found".to_string(),
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["code"], 500);
        assert_eq!(body["message"], "Error processing video");
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let response = UploadVideoError::BadRequest("Invalid file type".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await["message"], "Invalid file type");
    }

    #[tokio::test]
    async fn missing_and_invalid_tokens_have_distinct_messages() {
        let missing =
            UploadVideoError::MissingToken(anyhow::anyhow!("Missing Authorization header"))
                .into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(missing).await["message"], "Couldn't find JWT");

        let invalid = UploadVideoError::Unauthorized(anyhow::anyhow!("ExpiredSignature"))
            .into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_of(invalid).await["message"], "Couldn't validate JWT");
    }
}
