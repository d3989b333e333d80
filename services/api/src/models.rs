//! API models for request and response payloads

use serde::{Deserialize, Serialize};

/// Body of rate and update-rating requests
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub stars: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Genre,
    Content,
}

/// Query parameters for recommendations
#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(rename = "type")]
    pub kind: Option<RecommendationKind>,
    pub limit: Option<usize>,
}

/// Query parameters for leaderboards
#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub rating_id: i32,
    pub like_count: i64,
}
