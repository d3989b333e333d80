//! Rating lifecycle: creation, edits, confirmation, likes and deletion
//!
//! The `confirmed` flag moves between two states. A new rating starts
//! confirmed when it carries no comment and unconfirmed otherwise. Only the
//! author can confirm, and any change of comment text sends it back to
//! unconfirmed. The comment of an unconfirmed rating is hidden from everyone
//! but the author at read time; nothing is filtered at write time.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{MAX_STARS, MIN_STARS, Rating};
use crate::store::{MediaStore, RatingStore, UserStore};

/// Enforces the rating lifecycle on top of the storage ports
#[derive(Clone)]
pub struct RatingEngine {
    ratings: Arc<dyn RatingStore>,
    media: Arc<dyn MediaStore>,
    users: Arc<dyn UserStore>,
}

impl RatingEngine {
    pub fn new(
        ratings: Arc<dyn RatingStore>,
        media: Arc<dyn MediaStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            ratings,
            media,
            users,
        }
    }

    /// Rate a media entry. A user rates each media at most once.
    #[instrument(skip(self, comment))]
    pub async fn rate_media(
        &self,
        media_id: i32,
        user_id: i32,
        stars: i32,
        comment: Option<String>,
    ) -> EngineResult<Rating> {
        validate_stars(stars)?;

        if self.media.get_by_id(media_id).await?.is_none() {
            return Err(EngineError::not_found("Media", media_id));
        }
        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::not_found("User", user_id));
        }

        if self
            .ratings
            .get_by_user_and_media(user_id, media_id)
            .await?
            .is_some()
        {
            warn!("Duplicate rating rejected");
            return Err(EngineError::Conflict(
                "User has already rated this media. Use update instead.".to_string(),
            ));
        }

        let rating = Rating::new(media_id, user_id, stars, comment);
        let saved = self
            .ratings
            .save(&rating)
            .await?
            .ok_or_else(|| EngineError::Internal("Failed to save rating".to_string()))?;

        info!(rating_id = saved.id, confirmed = saved.confirmed, "Rating created");
        Ok(saved)
    }

    /// Fetch a rating as `requesting_user_id` is allowed to see it
    pub async fn get_public_rating(
        &self,
        rating_id: i32,
        requesting_user_id: Option<i32>,
    ) -> EngineResult<Option<Rating>> {
        let rating = self.ratings.get_by_id(rating_id).await?;
        Ok(rating.map(|r| r.visible_to(requesting_user_id)))
    }

    /// Fetch a rating without applying the visibility rule
    pub async fn get_rating(&self, rating_id: i32) -> EngineResult<Rating> {
        self.ratings
            .get_by_id(rating_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Rating", rating_id))
    }

    /// All ratings of a user, comments included
    pub async fn get_ratings_by_user(&self, user_id: i32) -> EngineResult<Vec<Rating>> {
        Ok(self.ratings.get_all_by_user(user_id).await?)
    }

    /// All ratings of a media entry, each filtered for `requesting_user_id`
    pub async fn get_media_ratings(
        &self,
        media_id: i32,
        requesting_user_id: Option<i32>,
    ) -> EngineResult<Vec<Rating>> {
        if self.media.get_by_id(media_id).await?.is_none() {
            return Err(EngineError::not_found("Media", media_id));
        }

        let ratings = self.ratings.get_all_by_media(media_id).await?;
        Ok(ratings
            .into_iter()
            .map(|r| r.visible_to(requesting_user_id))
            .collect())
    }

    /// Replace stars and comment. A changed comment needs confirming again.
    #[instrument(skip(self, comment))]
    pub async fn update_rating(
        &self,
        rating_id: i32,
        stars: i32,
        comment: Option<String>,
        user_id: i32,
    ) -> EngineResult<Rating> {
        validate_stars(stars)?;

        let existing = self.get_rating(rating_id).await?;
        if !existing.is_owned_by(user_id) {
            warn!("Rating update by non-owner rejected");
            return Err(EngineError::Forbidden(
                "User is not authorized to update this rating".to_string(),
            ));
        }

        let revised = existing.revised(stars, comment);
        let saved = self
            .ratings
            .save(&revised)
            .await?
            .ok_or_else(|| EngineError::Internal("Failed to update rating".to_string()))?;

        info!(
            was_confirmed = existing.confirmed,
            confirmed = saved.confirmed,
            "Rating updated"
        );
        Ok(saved)
    }

    /// Make the comment of a rating public
    #[instrument(skip(self))]
    pub async fn confirm_rating(&self, rating_id: i32, user_id: i32) -> EngineResult<bool> {
        let existing = self.get_rating(rating_id).await?;

        if !existing.is_owned_by(user_id) {
            return Err(EngineError::Forbidden(
                "User can only confirm their own ratings".to_string(),
            ));
        }
        if !existing.has_comment() {
            return Err(EngineError::InvalidState("No comment to confirm".to_string()));
        }
        if existing.confirmed {
            return Err(EngineError::InvalidState(
                "Comment is already confirmed".to_string(),
            ));
        }

        let confirmed = self.ratings.confirm(rating_id).await?;
        info!(confirmed, "Rating confirmation requested");
        Ok(confirmed)
    }

    #[instrument(skip(self))]
    pub async fn delete_rating(&self, rating_id: i32, user_id: i32) -> EngineResult<()> {
        let existing = self.get_rating(rating_id).await?;

        if !existing.is_owned_by(user_id) {
            return Err(EngineError::Forbidden(
                "User is not authorized to delete this rating".to_string(),
            ));
        }

        if !self.ratings.delete(&existing).await? {
            return Err(EngineError::Internal("Failed to delete rating".to_string()));
        }

        info!("Rating deleted");
        Ok(())
    }

    /// Like someone else's rating
    #[instrument(skip(self))]
    pub async fn like_rating(&self, rating_id: i32, user_id: i32) -> EngineResult<bool> {
        let rating = self.get_rating(rating_id).await?;

        if self.users.get_by_id(user_id).await?.is_none() {
            return Err(EngineError::not_found("User", user_id));
        }
        if rating.is_owned_by(user_id) {
            return Err(EngineError::InvalidState(
                "Users cannot like their own ratings".to_string(),
            ));
        }

        Ok(self.ratings.like(rating_id, user_id).await?)
    }

    pub async fn get_rating_like_count(&self, rating_id: i32) -> EngineResult<i64> {
        self.get_rating(rating_id).await?;
        Ok(self.ratings.like_count(rating_id).await?)
    }
}

fn validate_stars(stars: i32) -> EngineResult<()> {
    if (MIN_STARS..=MAX_STARS).contains(&stars) {
        Ok(())
    } else {
        Err(EngineError::InvalidInput(format!(
            "Stars must be between {} and {}",
            MIN_STARS, MAX_STARS
        )))
    }
}
