//! Favorite toggling with existence and duplicate checks

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{EngineError, EngineResult};
use crate::models::{Favorite, Media};
use crate::store::{FavoriteStore, MediaStore, UserStore};

#[derive(Clone)]
pub struct FavoriteCoordinator {
    favorites: Arc<dyn FavoriteStore>,
    users: Arc<dyn UserStore>,
    media: Arc<dyn MediaStore>,
}

impl FavoriteCoordinator {
    pub fn new(
        favorites: Arc<dyn FavoriteStore>,
        users: Arc<dyn UserStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            favorites,
            users,
            media,
        }
    }

    #[instrument(skip(self))]
    pub async fn add_favorite(&self, user_id: i32, media_id: i32) -> EngineResult<bool> {
        self.ensure_user_and_media(user_id, media_id).await?;

        if self.favorites.is_favorite(user_id, media_id).await? {
            return Err(EngineError::Conflict("Favorite already exists".to_string()));
        }

        let added = self.favorites.add(&Favorite::new(user_id, media_id)).await?;
        info!(added, "Favorite added");
        Ok(added)
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, user_id: i32, media_id: i32) -> EngineResult<bool> {
        self.ensure_user_and_media(user_id, media_id).await?;

        if !self.favorites.is_favorite(user_id, media_id).await? {
            return Err(EngineError::InvalidState(
                "Media is not in favorites".to_string(),
            ));
        }

        let removed = self.favorites.delete(user_id, media_id).await?;
        info!(removed, "Favorite removed");
        Ok(removed)
    }

    /// The user's favorites exactly as the store returns them
    pub async fn get_user_favorites(&self, user_id: i32) -> EngineResult<Vec<Media>> {
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::not_found("User", user_id));
        }
        Ok(self.favorites.get_user_favorites(user_id).await?)
    }

    async fn ensure_user_and_media(&self, user_id: i32, media_id: i32) -> EngineResult<()> {
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::not_found("User", user_id));
        }
        if self.media.get_by_id(media_id).await?.is_none() {
            return Err(EngineError::not_found("Media", media_id));
        }
        Ok(())
    }
}
