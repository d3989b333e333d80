//! Favorite repository

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::{Favorite, Media};
use domain::store::FavoriteStore;

use super::media_from_row;

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn is_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND media_id = $2)",
        )
        .bind(user_id)
        .bind(media_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add(&self, favorite: &Favorite) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, media_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, media_id) DO NOTHING
            "#,
        )
        .bind(favorite.user_id)
        .bind(favorite.media_id)
        .bind(favorite.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, user_id: i32, media_id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND media_id = $2")
            .bind(user_id)
            .bind(media_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_user_favorites(&self, user_id: i32) -> Result<Vec<Media>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.media_type, m.title, m.description, m.release_year,
                   m.age_restriction, m.creator_id, m.genres, m.created_at
            FROM favorites f
            JOIN media m ON m.id = f.media_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(media_from_row).collect()
    }

    async fn favorite_count_for_media(&self, media_id: i32) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE media_id = $1")
            .bind(media_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
