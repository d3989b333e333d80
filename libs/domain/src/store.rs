//! Storage ports consumed by the engines
//!
//! Every method reports backend failures through `anyhow::Result`. Absent rows
//! come back as `None`, rejected writes as `None` or `false`.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{
    Favorite, LeaderboardEntry, Media, MostLikedRating, Rating, TopRatedMedia, User,
};

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Media>>;

    async fn get_all(&self) -> Result<Vec<Media>>;

    /// Insert when `media.id` is 0, update otherwise
    async fn save(&self, media: &Media) -> Result<Option<Media>>;

    async fn delete(&self, media: &Media) -> Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<User>>;

    async fn get_by_name(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait RatingStore: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Rating>>;

    async fn get_by_user_and_media(&self, user_id: i32, media_id: i32) -> Result<Option<Rating>>;

    /// Newest first
    async fn get_all_by_user(&self, user_id: i32) -> Result<Vec<Rating>>;

    /// Newest first
    async fn get_all_by_media(&self, media_id: i32) -> Result<Vec<Rating>>;

    /// Insert when `rating.id` is 0, update stars, comment and confirmation otherwise
    async fn save(&self, rating: &Rating) -> Result<Option<Rating>>;

    async fn delete(&self, rating: &Rating) -> Result<bool>;

    async fn confirm(&self, rating_id: i32) -> Result<bool>;

    /// Record a like edge. Duplicate likes are absorbed and report `false`.
    async fn like(&self, rating_id: i32, user_id: i32) -> Result<bool>;

    async fn like_count(&self, rating_id: i32) -> Result<i64>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn is_favorite(&self, user_id: i32, media_id: i32) -> Result<bool>;

    async fn add(&self, favorite: &Favorite) -> Result<bool>;

    async fn delete(&self, user_id: i32, media_id: i32) -> Result<bool>;

    async fn get_user_favorites(&self, user_id: i32) -> Result<Vec<Media>>;

    async fn favorite_count_for_media(&self, media_id: i32) -> Result<i64>;
}

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    async fn most_active_users(&self, limit: i64) -> Result<Vec<LeaderboardEntry>>;

    async fn top_rated_media(&self, limit: i64) -> Result<Vec<TopRatedMedia>>;

    async fn most_liked_ratings(&self, limit: i64) -> Result<Vec<MostLikedRating>>;

    async fn trending_genres(&self) -> Result<Vec<String>>;
}
