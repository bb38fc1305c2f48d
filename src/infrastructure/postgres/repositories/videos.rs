use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::videos::{UpdateVideoEntity, VideoEntity},
        repositories::videos::VideoRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPool, schema::videos},
};

pub struct VideoPostgres {
    db_pool: Arc<PgPool>,
}

impl VideoPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VideoRepository for VideoPostgres {
    async fn find_video_by_id(&self, video_id: Uuid) -> Result<Option<VideoEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = videos::table
            .find(video_id)
            .select(VideoEntity::as_select())
            .first::<VideoEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_video(&self, video: VideoEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let changeset = UpdateVideoEntity::from(&video);

        let updated = update(videos::table.filter(videos::id.eq(video.id)))
            .set(&changeset)
            .execute(&mut conn)?;

        if updated == 0 {
            bail!("video {} no longer exists", video.id);
        }

        Ok(())
    }
}
