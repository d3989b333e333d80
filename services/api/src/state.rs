//! Application state shared across handlers

use std::sync::Arc;

use domain::store::{FavoriteStore, LeaderboardStore, MediaStore, RatingStore, UserStore};
use domain::{
    FavoriteCoordinator, LeaderboardService, MediaCatalog, RatingEngine, RecommendationEngine,
    UserProfiles,
};
use sqlx::PgPool;

use crate::middleware::JwtConfig;
use crate::repositories::{
    FavoriteRepository, LeaderboardRepository, MediaRepository, RatingRepository, UserRepository,
};
use crate::settings::Settings;

/// One handle per storage port
#[derive(Clone)]
pub struct Stores {
    pub media: Arc<dyn MediaStore>,
    pub users: Arc<dyn UserStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub leaderboard: Arc<dyn LeaderboardStore>,
}

impl Stores {
    /// Postgres repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            media: Arc::new(MediaRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            ratings: Arc::new(RatingRepository::new(pool.clone())),
            favorites: Arc::new(FavoriteRepository::new(pool.clone())),
            leaderboard: Arc::new(LeaderboardRepository::new(pool)),
        }
    }

    /// Every port served by the same backend
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: MediaStore + UserStore + RatingStore + FavoriteStore + LeaderboardStore + 'static,
    {
        Self {
            media: store.clone(),
            users: store.clone(),
            ratings: store.clone(),
            favorites: store.clone(),
            leaderboard: store,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ratings: RatingEngine,
    pub recommendations: RecommendationEngine,
    pub favorites: FavoriteCoordinator,
    pub catalog: MediaCatalog,
    pub leaderboard: LeaderboardService,
    pub profiles: UserProfiles,
    pub jwt: Arc<JwtConfig>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(stores: Stores, jwt: JwtConfig, settings: Settings) -> Self {
        Self {
            ratings: RatingEngine::new(
                stores.ratings.clone(),
                stores.media.clone(),
                stores.users.clone(),
            ),
            recommendations: RecommendationEngine::new(
                stores.media.clone(),
                stores.ratings.clone(),
                stores.favorites.clone(),
            ),
            favorites: FavoriteCoordinator::new(
                stores.favorites.clone(),
                stores.users.clone(),
                stores.media.clone(),
            ),
            catalog: MediaCatalog::new(stores.media.clone(), stores.users.clone()),
            profiles: UserProfiles::new(
                stores.users.clone(),
                stores.ratings.clone(),
                stores.media.clone(),
            ),
            leaderboard: LeaderboardService::new(stores.leaderboard),
            jwt: Arc::new(jwt),
            settings: Arc::new(settings),
        }
    }
}
