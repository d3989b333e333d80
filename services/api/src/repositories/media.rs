//! Media repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::Media;
use domain::store::MediaStore;

use super::media_from_row;

/// Media repository for database operations
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for MediaRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Media>> {
        let row = sqlx::query(
            r#"
            SELECT id, media_type, title, description, release_year, age_restriction,
                   creator_id, genres, created_at
            FROM media
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(media_from_row).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Media>> {
        let rows = sqlx::query(
            r#"
            SELECT id, media_type, title, description, release_year, age_restriction,
                   creator_id, genres, created_at
            FROM media
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(media_from_row).collect()
    }

    async fn save(&self, media: &Media) -> Result<Option<Media>> {
        let genres: Vec<String> = media.genres.iter().cloned().collect();

        let row = if media.is_persisted() {
            sqlx::query(
                r#"
                UPDATE media
                SET media_type = $2, title = $3, description = $4, release_year = $5,
                    age_restriction = $6, genres = $7
                WHERE id = $1
                RETURNING id, media_type, title, description, release_year, age_restriction,
                          creator_id, genres, created_at
                "#,
            )
            .bind(media.id)
            .bind(media.media_type.as_str())
            .bind(&media.title)
            .bind(&media.description)
            .bind(media.release_year)
            .bind(media.age_restriction)
            .bind(&genres)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query(
                r#"
                INSERT INTO media (media_type, title, description, release_year,
                                   age_restriction, creator_id, genres, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, media_type, title, description, release_year, age_restriction,
                          creator_id, genres, created_at
                "#,
            )
            .bind(media.media_type.as_str())
            .bind(&media.title)
            .bind(&media.description)
            .bind(media.release_year)
            .bind(media.age_restriction)
            .bind(media.creator_id)
            .bind(&genres)
            .bind(media.created_at)
            .fetch_optional(&self.pool)
            .await?
        };

        row.as_ref().map(media_from_row).transpose()
    }

    /// Ratings, likes and favorites of the media go with it (ON DELETE CASCADE)
    async fn delete(&self, media: &Media) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(media.id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
