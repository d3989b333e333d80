//! Rating and rating-like repository

use anyhow::Result;
use async_trait::async_trait;
use common::error::is_unique_violation;
use sqlx::PgPool;
use tracing::warn;

use domain::models::Rating;
use domain::store::RatingStore;

use super::rating_from_row;

#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, rating: &Rating) -> Result<Option<Rating>> {
        let result = sqlx::query(
            r#"
            INSERT INTO ratings (media_id, user_id, stars, comment, confirmed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, media_id, user_id, stars, comment, confirmed, created_at
            "#,
        )
        .bind(rating.media_id)
        .bind(rating.user_id)
        .bind(rating.stars)
        .bind(&rating.comment)
        .bind(rating.confirmed)
        .bind(rating.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(rating_from_row(&row)?)),
            // lost a race against a concurrent rating of the same media
            Err(e) if is_unique_violation(&e) => {
                warn!(
                    user_id = rating.user_id,
                    media_id = rating.media_id,
                    "Rating insert hit the unique constraint"
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, rating: &Rating) -> Result<Option<Rating>> {
        let row = sqlx::query(
            r#"
            UPDATE ratings
            SET stars = $2, comment = $3, confirmed = $4
            WHERE id = $1
            RETURNING id, media_id, user_id, stars, comment, confirmed, created_at
            "#,
        )
        .bind(rating.id)
        .bind(rating.stars)
        .bind(&rating.comment)
        .bind(rating.confirmed)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(rating_from_row).transpose()
    }
}

#[async_trait]
impl RatingStore for RatingRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Rating>> {
        let row = sqlx::query(
            r#"
            SELECT id, media_id, user_id, stars, comment, confirmed, created_at
            FROM ratings
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(rating_from_row).transpose()
    }

    async fn get_by_user_and_media(&self, user_id: i32, media_id: i32) -> Result<Option<Rating>> {
        let row = sqlx::query(
            r#"
            SELECT id, media_id, user_id, stars, comment, confirmed, created_at
            FROM ratings
            WHERE user_id = $1 AND media_id = $2
            "#,
        )
        .bind(user_id)
        .bind(media_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(rating_from_row).transpose()
    }

    async fn get_all_by_user(&self, user_id: i32) -> Result<Vec<Rating>> {
        let rows = sqlx::query(
            r#"
            SELECT id, media_id, user_id, stars, comment, confirmed, created_at
            FROM ratings
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(rating_from_row).collect()
    }

    async fn get_all_by_media(&self, media_id: i32) -> Result<Vec<Rating>> {
        let rows = sqlx::query(
            r#"
            SELECT id, media_id, user_id, stars, comment, confirmed, created_at
            FROM ratings
            WHERE media_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(media_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(rating_from_row).collect()
    }

    async fn save(&self, rating: &Rating) -> Result<Option<Rating>> {
        if rating.id == 0 {
            self.insert(rating).await
        } else {
            self.update(rating).await
        }
    }

    async fn delete(&self, rating: &Rating) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(rating.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn confirm(&self, rating_id: i32) -> Result<bool> {
        let result = sqlx::query("UPDATE ratings SET confirmed = TRUE WHERE id = $1")
            .bind(rating_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn like(&self, rating_id: i32, user_id: i32) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO rating_likes (rating_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (rating_id, user_id) DO NOTHING
            "#,
        )
        .bind(rating_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn like_count(&self, rating_id: i32) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rating_likes WHERE rating_id = $1")
            .bind(rating_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
