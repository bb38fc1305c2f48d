use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, timeout::TimeoutConfig};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    Client,
    config::Region,
    error::{ProvideErrorMetadata, SdkError},
    operation::put_object::PutObjectError,
    primitives::ByteStream,
};
use http::Uri;
use tokio::fs::File;
use tracing::info;

use crate::domain::repositories::object_storage::ObjectStorageClient;

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores; AWS resolves its own when unset.
    pub endpoint: Option<String>,
    /// Static credentials; the default provider chain is used when unset.
    pub credentials: Option<S3Credentials>,
    pub force_path_style: bool,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl S3Config {
    pub fn new(bucket: String, region: String) -> Self {
        Self {
            bucket,
            region,
            endpoint: None,
            credentials: None,
            force_path_style: false,
            connect_timeout_secs: 10,
            read_timeout_secs: 300,
        }
    }
}

fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let endpoint = format!("{}/", endpoint.trim_end_matches('/'));
    Uri::from_str(&endpoint).context("invalid s3 endpoint URL")?;
    Ok(endpoint)
}

pub async fn build_s3_client(config: &S3Config) -> Result<Client> {
    let region = Region::new(config.region.clone());
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region.clone())
        .timeout_config(
            TimeoutConfig::builder()
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .read_timeout(Duration::from_secs(config.read_timeout_secs))
                .build(),
        );

    if let Some(credentials) = &config.credentials {
        loader = loader.credentials_provider(Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            "static",
        ));
    }

    let shared_config = loader.load().await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
        .force_path_style(config.force_path_style)
        .region(region);

    if let Some(endpoint) = &config.endpoint {
        s3_config = s3_config.endpoint_url(normalize_endpoint(endpoint)?);
    }

    Ok(Client::from_conf(s3_config.build()))
}

pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
}

impl S3ObjectStorage {
    pub async fn new(config: &S3Config) -> Result<Self> {
        let client = build_s3_client(config)
            .await
            .context("failed to build s3 client")?;

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStorageClient for S3ObjectStorage {
    async fn put_object(&self, object_key: String, body: File, content_type: String) -> Result<()> {
        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .context("failed to read processed file")?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(body)
            .content_type(&content_type)
            .send()
            .await
            .map_err(|err| map_put_object_error(err, &self.bucket, &object_key))?;

        info!(bucket = %self.bucket, key = %object_key, "s3 upload completed");

        Ok(())
    }
}

fn map_put_object_error(
    err: SdkError<PutObjectError>,
    bucket: &str,
    object_key: &str,
) -> anyhow::Error {
    if let SdkError::ServiceError(service_err) = &err {
        let status = service_err.raw().status().as_u16();
        let code = service_err.err().code().unwrap_or("unknown");
        let message = service_err.err().message().unwrap_or_default();

        let mut detail = format!("failed to upload object (status {}, code {})", status, code);
        if !message.is_empty() {
            detail.push_str(&format!(": {}", message));
        }
        detail.push_str(&format!(" [bucket={}, key={}]", bucket, object_key));

        return anyhow::anyhow!(detail);
    }

    anyhow::Error::new(err).context(format!(
        "failed to upload object [bucket={}, key={}]",
        bucket, object_key
    ))
}
