//! Read-only leaderboard projections

use serde::{Deserialize, Serialize};

/// User ranked by activity: ratings count twice, created media three times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i32,
    pub username: String,
    pub rating_count: i64,
    pub favorite_count: i64,
    pub media_created_count: i64,
    pub activity_score: i64,
}

/// Media ranked by average stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRatedMedia {
    pub media_id: i32,
    pub title: String,
    pub media_type: String,
    pub release_year: i32,
    pub average_rating: f64,
    pub rating_count: i64,
}

/// Confirmed rating ranked by likes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostLikedRating {
    pub rating_id: i32,
    pub stars: i32,
    pub comment: Option<String>,
    pub media_title: String,
    pub author_name: String,
    pub like_count: i64,
}
