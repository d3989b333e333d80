//! User profile with rating statistics

use serde::{Deserialize, Serialize};

use super::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    pub total_ratings: i64,
    /// 0.0 when the user has not rated anything
    pub average_rating: f64,
    pub media_created: i64,
    pub favorite_genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    pub statistics: ProfileStatistics,
}
