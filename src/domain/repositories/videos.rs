use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::videos::VideoEntity;

#[async_trait]
#[automock]
pub trait VideoRepository {
    async fn find_video_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>>;
    async fn update_video(&self, video: VideoEntity) -> Result<()>;
}
