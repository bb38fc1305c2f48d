use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use tokio::fs::File;

#[async_trait]
#[automock]
pub trait ObjectStorageClient {
    /// Stores `body` under `object_key` in the configured bucket.
    async fn put_object(&self, object_key: String, body: File, content_type: String) -> Result<()>;
}
