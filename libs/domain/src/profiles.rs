//! Per-user statistics assembled from ratings and created media

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{EngineError, EngineResult};
use crate::models::{Media, ProfileStatistics, Rating, UserProfile};
use crate::store::{MediaStore, RatingStore, UserStore};

#[derive(Clone)]
pub struct UserProfiles {
    users: Arc<dyn UserStore>,
    ratings: Arc<dyn RatingStore>,
    media: Arc<dyn MediaStore>,
}

impl UserProfiles {
    pub fn new(
        users: Arc<dyn UserStore>,
        ratings: Arc<dyn RatingStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            users,
            ratings,
            media,
        }
    }

    /// Profile of `user_id` with totals over everything the user rated or created.
    ///
    /// The favorite genre is the one stored on the user when set, otherwise
    /// the genre appearing most often among the rated media, ties going to
    /// the alphabetically first.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: i32) -> EngineResult<UserProfile> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::not_found("User", user_id))?;

        let ratings = self.ratings.get_all_by_user(user_id).await?;
        let all_media = self.media.get_all().await?;

        let media_created = all_media
            .iter()
            .filter(|media| media.creator_id == user_id)
            .count() as i64;

        let favorite_genre = match &user.favorite_genre {
            Some(genre) if !genre.trim().is_empty() => Some(genre.clone()),
            _ => most_rated_genre(&ratings, &all_media),
        };

        debug!(total_ratings = ratings.len(), media_created, "Profile assembled");
        Ok(UserProfile {
            statistics: ProfileStatistics {
                total_ratings: ratings.len() as i64,
                average_rating: average_stars(&ratings),
                media_created,
                favorite_genre,
            },
            user,
        })
    }
}

fn average_stars(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|r| r.stars as f64).sum::<f64>() / ratings.len() as f64
}

fn most_rated_genre(ratings: &[Rating], all_media: &[Media]) -> Option<String> {
    let by_id: BTreeMap<i32, &Media> = all_media.iter().map(|m| (m.id, m)).collect();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rating in ratings {
        if let Some(media) = by_id.get(&rating.media_id) {
            for genre in &media.genres {
                *counts.entry(genre.as_str()).or_default() += 1;
            }
        }
    }

    // max_by_key keeps the last maximum; iterate in reverse so ties resolve alphabetically
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(genre, _)| genre.to_string())
}
