//! Leaderboards, aggregated by the store

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::{LeaderboardEntry, MostLikedRating, TopRatedMedia};
use crate::store::LeaderboardStore;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct LeaderboardService {
    store: Arc<dyn LeaderboardStore>,
}

impl LeaderboardService {
    pub fn new(store: Arc<dyn LeaderboardStore>) -> Self {
        Self { store }
    }

    pub async fn most_active_users(&self, limit: i64) -> EngineResult<Vec<LeaderboardEntry>> {
        Ok(self.store.most_active_users(effective_limit(limit)).await?)
    }

    pub async fn top_rated_media(&self, limit: i64) -> EngineResult<Vec<TopRatedMedia>> {
        Ok(self.store.top_rated_media(effective_limit(limit)).await?)
    }

    pub async fn most_liked_ratings(&self, limit: i64) -> EngineResult<Vec<MostLikedRating>> {
        Ok(self.store.most_liked_ratings(effective_limit(limit)).await?)
    }

    pub async fn trending_genres(&self) -> EngineResult<Vec<String>> {
        Ok(self.store.trending_genres().await?)
    }
}

/// Out of range limits fall back to the default rather than being clamped
fn effective_limit(limit: i64) -> i64 {
    if (1..=MAX_LEADERBOARD_LIMIT).contains(&limit) {
        limit
    } else {
        DEFAULT_LEADERBOARD_LIMIT
    }
}
