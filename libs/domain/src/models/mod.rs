//! Domain entities of the media ratings platform

pub mod favorite;
pub mod leaderboard;
pub mod media;
pub mod profile;
pub mod rating;
pub mod user;

// Re-export for convenience
pub use favorite::Favorite;
pub use leaderboard::{LeaderboardEntry, MostLikedRating, TopRatedMedia};
pub use media::{Media, MediaChanges, MediaType, NewMedia, normalize_genres};
pub use profile::{ProfileStatistics, UserProfile};
pub use rating::{MAX_STARS, MIN_STARS, Rating};
pub use user::User;
