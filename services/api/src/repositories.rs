//! Postgres implementations of the domain storage ports

use anyhow::Result;
use sqlx::{Row, postgres::PgRow};

use domain::models::{Media, Rating, User};

pub mod favorite;
pub mod leaderboard;
pub mod media;
pub mod rating;
pub mod user;

pub use favorite::FavoriteRepository;
pub use leaderboard::LeaderboardRepository;
pub use media::MediaRepository;
pub use rating::RatingRepository;
pub use user::UserRepository;

pub(crate) fn media_from_row(row: &PgRow) -> Result<Media> {
    let media_type: String = row.try_get("media_type")?;
    let genres: Vec<String> = row.try_get("genres")?;

    Ok(Media {
        id: row.try_get("id")?,
        media_type: media_type.parse().map_err(anyhow::Error::msg)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        release_year: row.try_get("release_year")?,
        age_restriction: row.try_get("age_restriction")?,
        creator_id: row.try_get("creator_id")?,
        genres: genres.into_iter().collect(),
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn rating_from_row(row: &PgRow) -> Result<Rating> {
    Ok(Rating {
        id: row.try_get("id")?,
        media_id: row.try_get("media_id")?,
        user_id: row.try_get("user_id")?,
        stars: row.try_get("stars")?,
        comment: row.try_get("comment")?,
        confirmed: row.try_get("confirmed")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        favorite_genre: row.try_get("favorite_genre")?,
        created_at: row.try_get("created_at")?,
    })
}
