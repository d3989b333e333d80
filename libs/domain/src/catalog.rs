//! Media entries owned by their creators

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::{info, instrument, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{Media, MediaChanges, NewMedia};
use crate::store::{MediaStore, UserStore};

/// Earliest release year accepted for a media entry
pub const MIN_RELEASE_YEAR: i32 = 1850;

#[derive(Clone)]
pub struct MediaCatalog {
    media: Arc<dyn MediaStore>,
    users: Arc<dyn UserStore>,
}

impl MediaCatalog {
    pub fn new(media: Arc<dyn MediaStore>, users: Arc<dyn UserStore>) -> Self {
        Self { media, users }
    }

    #[instrument(skip(self, new_media), fields(title = %new_media.title))]
    pub async fn create_media(&self, creator_id: i32, new_media: NewMedia) -> EngineResult<Media> {
        if self.users.get_by_id(creator_id).await?.is_none() {
            return Err(EngineError::not_found("User", creator_id));
        }

        let media = Media::new(creator_id, new_media);
        validate(&media)?;

        let saved = self
            .media
            .save(&media)
            .await?
            .ok_or_else(|| EngineError::Internal("Failed to save media".to_string()))?;

        info!(media_id = saved.id, "Media created");
        Ok(saved)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_media(
        &self,
        media_id: i32,
        creator_id: i32,
        changes: MediaChanges,
    ) -> EngineResult<Media> {
        let existing = self.get_media(media_id).await?;
        if existing.creator_id != creator_id {
            warn!("Media update by non-creator rejected");
            return Err(EngineError::Forbidden(
                "Only the creator can modify this media".to_string(),
            ));
        }

        let updated = existing.with_changes(changes);
        validate(&updated)?;

        self.media
            .save(&updated)
            .await?
            .ok_or_else(|| EngineError::Internal("Failed to update media".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn delete_media(&self, media_id: i32, creator_id: i32) -> EngineResult<bool> {
        let existing = self.get_media(media_id).await?;
        if existing.creator_id != creator_id {
            return Err(EngineError::Forbidden(
                "Only the creator can delete this media".to_string(),
            ));
        }

        let deleted = self.media.delete(&existing).await?;
        info!(deleted, "Media deleted");
        Ok(deleted)
    }

    pub async fn get_media(&self, media_id: i32) -> EngineResult<Media> {
        self.media
            .get_by_id(media_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Media", media_id))
    }

    pub async fn list_media(&self) -> EngineResult<Vec<Media>> {
        Ok(self.media.get_all().await?)
    }

    pub async fn media_by_creator(&self, creator_id: i32) -> EngineResult<Vec<Media>> {
        let all = self.media.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|media| media.creator_id == creator_id)
            .collect())
    }
}

fn validate(media: &Media) -> EngineResult<()> {
    if media.title.is_empty() {
        return Err(EngineError::InvalidInput("Title is required".to_string()));
    }

    let latest_year = Utc::now().year() + 10;
    if !(MIN_RELEASE_YEAR..=latest_year).contains(&media.release_year) {
        return Err(EngineError::InvalidInput(format!(
            "Release year must be between {} and {}",
            MIN_RELEASE_YEAR, latest_year
        )));
    }

    if media.age_restriction < 0 {
        return Err(EngineError::InvalidInput(
            "Age restriction cannot be negative".to_string(),
        ));
    }

    Ok(())
}
