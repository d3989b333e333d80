//! Shared fixtures for the engine integration tests

#![allow(dead_code)]

use std::sync::Arc;

use domain::memory::MemoryStore;
use domain::models::{Media, MediaType, NewMedia, User};
use domain::{
    FavoriteCoordinator, LeaderboardService, MediaCatalog, RatingEngine, RecommendationEngine,
    UserProfiles,
};

/// Every engine wired to one in-memory store
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub ratings: RatingEngine,
    pub recommendations: RecommendationEngine,
    pub favorites: FavoriteCoordinator,
    pub catalog: MediaCatalog,
    pub leaderboard: LeaderboardService,
    pub profiles: UserProfiles,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            ratings: RatingEngine::new(store.clone(), store.clone(), store.clone()),
            recommendations: RecommendationEngine::new(store.clone(), store.clone(), store.clone()),
            favorites: FavoriteCoordinator::new(store.clone(), store.clone(), store.clone()),
            catalog: MediaCatalog::new(store.clone(), store.clone()),
            leaderboard: LeaderboardService::new(store.clone()),
            profiles: UserProfiles::new(store.clone(), store.clone(), store.clone()),
            store,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.store.insert_user(username).await
    }

    pub async fn media(&self, creator: &User, title: &str, genres: &[&str]) -> Media {
        self.typed_media(creator, title, MediaType::Movie, 12, genres).await
    }

    pub async fn typed_media(
        &self,
        creator: &User,
        title: &str,
        media_type: MediaType,
        age_restriction: i32,
        genres: &[&str],
    ) -> Media {
        self.catalog
            .create_media(
                creator.id,
                NewMedia {
                    media_type,
                    title: title.to_string(),
                    description: format!("{} description", title),
                    release_year: 2020,
                    age_restriction,
                    genres: genres.iter().map(|g| g.to_string()).collect(),
                },
            )
            .await
            .expect("media fixture should be created")
    }
}

pub fn ids(media: &[Media]) -> Vec<i32> {
    media.iter().map(|m| m.id).collect()
}
