//! Core business rules of the media ratings platform
//!
//! The engines in this crate own the rating lifecycle, comment visibility,
//! favorites and recommendation scoring. They depend only on the storage
//! ports in [`store`], injected at construction, and keep no state between
//! calls. Uniqueness under concurrent requests is left to the store's
//! constraints: the engines' existence checks are check-then-act.

pub mod catalog;
pub mod error;
pub mod favorites;
pub mod leaderboard;
pub mod memory;
pub mod models;
pub mod profiles;
pub mod ratings;
pub mod recommendations;
pub mod store;

pub use catalog::MediaCatalog;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use favorites::FavoriteCoordinator;
pub use leaderboard::LeaderboardService;
pub use profiles::UserProfiles;
pub use ratings::RatingEngine;
pub use recommendations::{RecommendationEngine, UserPreferences};
