//! Leaderboard aggregates computed in SQL

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use domain::models::{LeaderboardEntry, MostLikedRating, TopRatedMedia};
use domain::store::LeaderboardStore;

#[derive(Clone)]
pub struct LeaderboardRepository {
    pool: PgPool,
}

impl LeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardStore for LeaderboardRepository {
    /// Activity score = ratings * 2 + favorites + media created * 3
    async fn most_active_users(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, rating_count, favorite_count, media_created_count,
                   rating_count * 2 + favorite_count + media_created_count * 3 AS activity_score
            FROM (
                SELECT u.id, u.username,
                       (SELECT COUNT(*) FROM ratings r WHERE r.user_id = u.id) AS rating_count,
                       (SELECT COUNT(*) FROM favorites f WHERE f.user_id = u.id) AS favorite_count,
                       (SELECT COUNT(*) FROM media m WHERE m.creator_id = u.id) AS media_created_count
                FROM users u
            ) AS activity
            ORDER BY activity_score DESC, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<LeaderboardEntry> {
                Ok(LeaderboardEntry {
                    user_id: row.try_get("id")?,
                    username: row.try_get("username")?,
                    rating_count: row.try_get("rating_count")?,
                    favorite_count: row.try_get("favorite_count")?,
                    media_created_count: row.try_get("media_created_count")?,
                    activity_score: row.try_get("activity_score")?,
                })
            })
            .collect()
    }

    async fn top_rated_media(&self, limit: i64) -> Result<Vec<TopRatedMedia>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.title, m.media_type, m.release_year,
                   AVG(r.stars)::FLOAT8 AS average_rating,
                   COUNT(r.id) AS rating_count
            FROM media m
            JOIN ratings r ON r.media_id = m.id
            GROUP BY m.id
            HAVING COUNT(r.id) >= 2
            ORDER BY average_rating DESC, rating_count DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<TopRatedMedia> {
                Ok(TopRatedMedia {
                    media_id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    media_type: row.try_get("media_type")?,
                    release_year: row.try_get("release_year")?,
                    average_rating: row.try_get("average_rating")?,
                    rating_count: row.try_get("rating_count")?,
                })
            })
            .collect()
    }

    /// Confirmed ratings only, so no pending comment is exposed
    async fn most_liked_ratings(&self, limit: i64) -> Result<Vec<MostLikedRating>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.stars, r.comment,
                   m.title AS media_title,
                   u.username AS author_name,
                   COUNT(l.user_id) AS like_count
            FROM ratings r
            JOIN media m ON m.id = r.media_id
            JOIN users u ON u.id = r.user_id
            LEFT JOIN rating_likes l ON l.rating_id = r.id
            WHERE r.confirmed
            GROUP BY r.id, m.title, u.username
            ORDER BY like_count DESC, r.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<MostLikedRating> {
                Ok(MostLikedRating {
                    rating_id: row.try_get("id")?,
                    stars: row.try_get("stars")?,
                    comment: row.try_get("comment")?,
                    media_title: row.try_get("media_title")?,
                    author_name: row.try_get("author_name")?,
                    like_count: row.try_get("like_count")?,
                })
            })
            .collect()
    }

    async fn trending_genres(&self) -> Result<Vec<String>> {
        let genres: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT genre
            FROM (
                SELECT UNNEST(m.genres) AS genre
                FROM ratings r
                JOIN media m ON m.id = r.media_id
                WHERE r.created_at >= NOW() - INTERVAL '7 days'
            ) AS recent
            GROUP BY genre
            ORDER BY COUNT(*) DESC, genre
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }
}
