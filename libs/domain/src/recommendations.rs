//! Personalized media rankings
//!
//! Two variants rank the media a user has not rated yet: a genre-based one
//! driven by the genres of highly rated media, and a content-based one that
//! blends genre overlap with media type and age restriction closeness. Both
//! fall back to popularity when the user's history carries no signal.
//!
//! Ratings pointing at media that no longer exists are skipped.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::EngineResult;
use crate::models::{Media, MediaType, Rating};
use crate::store::{FavoriteStore, MediaStore, RatingStore};

/// Reference genres used to rank media for users without history
pub const COMMON_GENRES: [&str; 4] = ["action", "drama", "comedy", "adventure"];

/// Ratings at or above this many stars count as "liked"
pub const HIGH_RATING_STARS: i32 = 4;

pub const GENRE_WEIGHT: f64 = 0.5;
pub const MEDIA_TYPE_WEIGHT: f64 = 0.3;
pub const AGE_RESTRICTION_WEIGHT: f64 = 0.2;

const AGE_RESTRICTION_SPAN: f64 = 18.0;
const POPULARITY_BOOST_DIVISOR: f64 = 1000.0;
const RATED_FAVORITE_WEIGHT: f64 = 0.5;

/// Taste profile derived from a user's rating history
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserPreferences {
    pub favorite_genres: BTreeSet<String>,
    pub preferred_media_type: Option<MediaType>,
    pub preferred_age_restriction: i32,
}

/// Computes recommendations from the storage ports
#[derive(Clone)]
pub struct RecommendationEngine {
    media: Arc<dyn MediaStore>,
    ratings: Arc<dyn RatingStore>,
    favorites: Arc<dyn FavoriteStore>,
}

impl RecommendationEngine {
    pub fn new(
        media: Arc<dyn MediaStore>,
        ratings: Arc<dyn RatingStore>,
        favorites: Arc<dyn FavoriteStore>,
    ) -> Self {
        Self {
            media,
            ratings,
            favorites,
        }
    }

    /// Rank unrated media by overlap with the genres of the user's liked media
    #[instrument(skip(self))]
    pub async fn get_genre_based_recommendations(
        &self,
        user_id: i32,
        limit: usize,
    ) -> EngineResult<Vec<Media>> {
        let user_ratings = self.ratings.get_all_by_user(user_id).await?;

        if user_ratings.is_empty() {
            debug!("No rating history, ranking by common genres");
            return self.get_popular_media_by_common_genres(limit).await;
        }

        let rated = self.rated_media(&user_ratings).await?;
        let favorite_genres = genres_of(rated.iter().filter(|(r, _)| is_high(r)));

        if favorite_genres.is_empty() {
            debug!("No highly rated media, ranking by popularity");
            return self.get_popular_media(limit).await;
        }

        let candidates = unrated(self.media.get_all().await?, &user_ratings);
        let popularity = self.popularity_scores(&candidates).await?;

        let scored = candidates
            .into_iter()
            .map(|media| {
                let score = similarity_with_boost(&media, &favorite_genres, popularity[&media.id]);
                (media, score)
            })
            .collect();

        Ok(top_by_score(scored, limit))
    }

    /// Rank unrated media by genre, media type and age restriction closeness
    #[instrument(skip(self))]
    pub async fn get_content_based_recommendations(
        &self,
        user_id: i32,
        limit: usize,
    ) -> EngineResult<Vec<Media>> {
        let user_ratings = self.ratings.get_all_by_user(user_id).await?;

        if user_ratings.is_empty() {
            debug!("No rating history, ranking by popularity");
            return self.get_popular_media(limit).await;
        }

        let rated = self.rated_media(&user_ratings).await?;
        let preferences = user_preferences(&rated);
        debug!(?preferences, "Derived user preferences");

        let candidates = unrated(self.media.get_all().await?, &user_ratings);
        let popularity = self.popularity_scores(&candidates).await?;

        let scored = candidates
            .into_iter()
            .map(|media| {
                let genre_score = similarity_with_boost(
                    &media,
                    &preferences.favorite_genres,
                    popularity[&media.id],
                );
                let score = content_score(&media, genre_score, &preferences);
                (media, score)
            })
            .collect();

        Ok(top_by_score(scored, limit))
    }

    /// Jaccard overlap of genres plus a popularity boost of `popularity / 1000`.
    ///
    /// Exactly 0 when either genre set is empty.
    pub async fn genre_similarity_score(
        &self,
        media: &Media,
        reference_genres: &BTreeSet<String>,
    ) -> EngineResult<f64> {
        if media.genres.is_empty() || reference_genres.is_empty() {
            return Ok(0.0);
        }
        let popularity = self.popularity_score(media).await?;
        Ok(similarity_with_boost(media, reference_genres, popularity))
    }

    /// Engagement score of a media entry
    pub async fn popularity_score(&self, media: &Media) -> EngineResult<f64> {
        let ratings = self.ratings.get_all_by_media(media.id).await?;
        let favorite_count = self.favorites.favorite_count_for_media(media.id).await?;
        Ok(popularity(&ratings, favorite_count))
    }

    /// All media, most popular first
    pub async fn get_popular_media(&self, limit: usize) -> EngineResult<Vec<Media>> {
        let all_media = self.media.get_all().await?;
        let popularity = self.popularity_scores(&all_media).await?;

        let scored = all_media
            .into_iter()
            .map(|media| {
                let score = popularity[&media.id];
                (media, score)
            })
            .collect();

        Ok(top_by_score(scored, limit))
    }

    /// All media ranked by similarity to [`COMMON_GENRES`], then popularity
    pub async fn get_popular_media_by_common_genres(
        &self,
        limit: usize,
    ) -> EngineResult<Vec<Media>> {
        let common: BTreeSet<String> = COMMON_GENRES.iter().map(|g| g.to_string()).collect();
        let all_media = self.media.get_all().await?;
        let popularity = self.popularity_scores(&all_media).await?;

        let mut scored: Vec<(Media, f64, f64)> = all_media
            .into_iter()
            .map(|media| {
                let pop = popularity[&media.id];
                let similarity = similarity_with_boost(&media, &common, pop);
                (media, similarity, pop)
            })
            .collect();

        scored.sort_by(|(_, sim_a, pop_a), (_, sim_b, pop_b)| {
            sim_b.total_cmp(sim_a).then_with(|| pop_b.total_cmp(pop_a))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(media, _, _)| media)
            .collect())
    }

    /// Pair each rating with its media, skipping ratings whose media is gone
    async fn rated_media(&self, ratings: &[Rating]) -> EngineResult<Vec<(Rating, Media)>> {
        let mut rated = Vec::with_capacity(ratings.len());
        for rating in ratings {
            match self.media.get_by_id(rating.media_id).await? {
                Some(media) => rated.push((rating.clone(), media)),
                None => debug!(
                    rating_id = rating.id,
                    media_id = rating.media_id,
                    "Skipping rating of missing media"
                ),
            }
        }
        Ok(rated)
    }

    async fn popularity_scores(&self, media: &[Media]) -> EngineResult<HashMap<i32, f64>> {
        let mut scores = HashMap::with_capacity(media.len());
        for item in media {
            scores.insert(item.id, self.popularity_score(item).await?);
        }
        Ok(scores)
    }
}

/// Derive preferences from the highly rated media, or from everything rated
/// when nothing reaches [`HIGH_RATING_STARS`]
pub fn user_preferences(rated: &[(Rating, Media)]) -> UserPreferences {
    let high: Vec<&(Rating, Media)> = rated.iter().filter(|(r, _)| is_high(r)).collect();
    let basis: Vec<&(Rating, Media)> = if high.is_empty() {
        rated.iter().collect()
    } else {
        high
    };

    let favorite_genres = genres_of(basis.iter().copied());

    // mode of media type, first seen wins a tie
    let mut type_counts: Vec<(MediaType, usize)> = Vec::new();
    for (_, media) in &basis {
        match type_counts.iter_mut().find(|(t, _)| *t == media.media_type) {
            Some((_, count)) => *count += 1,
            None => type_counts.push((media.media_type, 1)),
        }
    }
    let mut preferred_media_type = None;
    let mut best = 0;
    for (media_type, count) in type_counts {
        if count > best {
            best = count;
            preferred_media_type = Some(media_type);
        }
    }

    let preferred_age_restriction = if basis.is_empty() {
        0
    } else {
        let total: i64 = basis.iter().map(|(_, m)| m.age_restriction as i64).sum();
        (total as f64 / basis.len() as f64).round() as i32
    };

    UserPreferences {
        favorite_genres,
        preferred_media_type,
        preferred_age_restriction,
    }
}

/// `|a ∩ b| / |a ∪ b|`, 0 when both are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Total engagement: `avg_stars * rating_count + favorites * 0.5`, or the raw
/// favorite count when nobody rated the media yet
pub fn popularity(ratings: &[Rating], favorite_count: i64) -> f64 {
    if ratings.is_empty() {
        return favorite_count as f64;
    }
    let total_stars: i64 = ratings.iter().map(|r| r.stars as i64).sum();
    let average = total_stars as f64 / ratings.len() as f64;
    average * ratings.len() as f64 + favorite_count as f64 * RATED_FAVORITE_WEIGHT
}

/// Weighted content score. The age term is not floored and goes negative
/// once the age restriction gap exceeds 18.
pub fn content_score(media: &Media, genre_score: f64, preferences: &UserPreferences) -> f64 {
    let mut score = genre_score * GENRE_WEIGHT;

    if preferences.preferred_media_type == Some(media.media_type) {
        score += MEDIA_TYPE_WEIGHT;
    }

    let age_diff = (media.age_restriction - preferences.preferred_age_restriction).abs() as f64;
    let age_score = 1.0 - age_diff / AGE_RESTRICTION_SPAN;
    score + age_score * AGE_RESTRICTION_WEIGHT
}

fn similarity_with_boost(media: &Media, reference: &BTreeSet<String>, popularity: f64) -> f64 {
    if media.genres.is_empty() || reference.is_empty() {
        return 0.0;
    }
    jaccard(&media.genres, reference) + popularity / POPULARITY_BOOST_DIVISOR
}

fn is_high(rating: &Rating) -> bool {
    rating.stars >= HIGH_RATING_STARS
}

fn genres_of<'a, I>(rated: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a (Rating, Media)>,
{
    rated
        .into_iter()
        .flat_map(|(_, media)| media.genres.iter().cloned())
        .collect()
}

fn unrated(all_media: Vec<Media>, user_ratings: &[Rating]) -> Vec<Media> {
    all_media
        .into_iter()
        .filter(|media| !user_ratings.iter().any(|r| r.media_id == media.id))
        .collect()
}

/// Highest score first; the sort is stable so ties keep store order
fn top_by_score(mut scored: Vec<(Media, f64)>, limit: usize) -> Vec<Media> {
    scored.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    scored
        .into_iter()
        .take(limit)
        .map(|(media, _)| media)
        .collect()
}
