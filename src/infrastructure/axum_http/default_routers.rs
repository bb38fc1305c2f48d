use axum::{
    Json,
    http::{StatusCode, Uri},
    response::IntoResponse,
};
use tracing::debug;

use super::error_responses::ErrorResponse;

pub async fn not_found(uri: Uri) -> impl IntoResponse {
    debug!(path = %uri.path(), "no route matched");

    let body = Json(ErrorResponse {
        code: StatusCode::NOT_FOUND.as_u16(),
        message: "NOT_FOUND".to_string(),
    });
    (StatusCode::NOT_FOUND, body)
}

pub async fn health_check() -> &'static str {
    "OK"
}
