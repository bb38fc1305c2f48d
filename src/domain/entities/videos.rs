use chrono::{DateTime, Utc};
use diesel::{AsChangeset, prelude::*};
use uuid::Uuid;

use crate::infrastructure::postgres::schema::videos;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = videos)]
pub struct VideoEntity {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = videos)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateVideoEntity {
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&VideoEntity> for UpdateVideoEntity {
    fn from(value: &VideoEntity) -> Self {
        Self {
            title: value.title.clone(),
            description: value.description.clone(),
            thumbnail_url: value.thumbnail_url.clone(),
            video_url: value.video_url.clone(),
            updated_at: value.updated_at,
        }
    }
}
