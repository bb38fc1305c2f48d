use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    extract::State,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    application::usecases::upload_video::{UploadVideoError, UploadVideoUseCase},
    config::config_model::DotEnvyConfig,
    infrastructure::axum_http::{default_routers, routers},
};

// Room for the multipart boundaries and part headers around the file itself.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

pub fn build_router(config: &DotEnvyConfig, upload_usecase: Arc<UploadVideoUseCase>) -> Result<Router> {
    let max_upload_bytes = config.upload.max_upload_bytes;
    let body_limit = max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/videos", routers::videos::routes(upload_usecase))
        .route("/api/healthz", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(body_limit.try_into()?))
        .layer(middleware::map_response_with_state(
            max_upload_bytes,
            body_limit_rejection_as_json,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Rewrites the plain-text 413 produced by the body limit layer into the JSON error body.
async fn body_limit_rejection_as_json(State(limit): State<u64>, response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json(&response) {
        return response;
    }

    UploadVideoError::PayloadTooLarge { limit }.into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

pub async fn start(config: Arc<DotEnvyConfig>, upload_usecase: Arc<UploadVideoUseCase>) -> Result<()> {
    let app = build_router(&config, upload_usecase)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
