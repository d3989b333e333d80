//! In-memory implementation of every storage port
//!
//! Mirrors the Postgres schema constraints (unique rating per user and media,
//! unique favorite and like edges, cascading media deletion) so engines behave
//! the same against it. Used by the test suites and for running the API
//! without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::models::{
    Favorite, LeaderboardEntry, Media, MostLikedRating, Rating, TopRatedMedia, User,
};
use crate::store::{FavoriteStore, LeaderboardStore, MediaStore, RatingStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    media: BTreeMap<i32, Media>,
    ratings: BTreeMap<i32, Rating>,
    likes: BTreeSet<(i32, i32)>,
    favorites: BTreeMap<(i32, i32), Favorite>,
    next_user_id: i32,
    next_media_id: i32,
    next_rating_id: i32,
}

/// Shared in-memory backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    rating_saves: AtomicUsize,
    reject_saves: AtomicBool,
    reject_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, standing in for the registration service
    pub async fn insert_user(&self, username: &str) -> User {
        let mut tables = self.tables.write().await;
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: username.to_string(),
            password_hash: String::new(),
            favorite_genre: None,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Store a user's declared favorite genre
    pub async fn set_favorite_genre(&self, user_id: i32, genre: &str) {
        if let Some(user) = self.tables.write().await.users.get_mut(&user_id) {
            user.favorite_genre = Some(genre.to_string());
        }
    }

    /// Remove a media row without cascading, leaving dangling ratings behind
    pub async fn forget_media(&self, media_id: i32) {
        self.tables.write().await.media.remove(&media_id);
    }

    /// Number of rating saves attempted so far
    pub fn rating_save_count(&self) -> usize {
        self.rating_saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent media and rating save report failure
    pub fn reject_saves(&self, reject: bool) {
        self.reject_saves.store(reject, Ordering::SeqCst);
    }

    /// Make every subsequent rating and favorite delete a no-op reporting `false`
    pub fn reject_deletes(&self, reject: bool) {
        self.reject_deletes.store(reject, Ordering::SeqCst);
    }

    fn saves_rejected(&self) -> bool {
        self.reject_saves.load(Ordering::SeqCst)
    }

    fn deletes_rejected(&self) -> bool {
        self.reject_deletes.load(Ordering::SeqCst)
    }
}

fn newest_first(mut ratings: Vec<Rating>) -> Vec<Rating> {
    ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    ratings
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn get_by_id(&self, id: i32) -> Result<Option<Media>> {
        Ok(self.tables.read().await.media.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Media>> {
        Ok(self.tables.read().await.media.values().cloned().collect())
    }

    async fn save(&self, media: &Media) -> Result<Option<Media>> {
        if self.saves_rejected() {
            return Ok(None);
        }

        let mut tables = self.tables.write().await;
        let mut saved = media.clone();
        if media.is_persisted() {
            if !tables.media.contains_key(&media.id) {
                return Ok(None);
            }
        } else {
            tables.next_media_id += 1;
            saved.id = tables.next_media_id;
        }
        tables.media.insert(saved.id, saved.clone());
        Ok(Some(saved))
    }

    async fn delete(&self, media: &Media) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.media.remove(&media.id).is_none() {
            return Ok(false);
        }

        let orphaned: Vec<i32> = tables
            .ratings
            .values()
            .filter(|r| r.media_id == media.id)
            .map(|r| r.id)
            .collect();
        for rating_id in &orphaned {
            tables.ratings.remove(rating_id);
        }
        tables.likes.retain(|(rating_id, _)| !orphaned.contains(rating_id));
        tables.favorites.retain(|(_, media_id), _| *media_id != media.id);
        Ok(true)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_name(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl RatingStore for MemoryStore {
    async fn get_by_id(&self, id: i32) -> Result<Option<Rating>> {
        Ok(self.tables.read().await.ratings.get(&id).cloned())
    }

    async fn get_by_user_and_media(&self, user_id: i32, media_id: i32) -> Result<Option<Rating>> {
        Ok(self
            .tables
            .read()
            .await
            .ratings
            .values()
            .find(|r| r.user_id == user_id && r.media_id == media_id)
            .cloned())
    }

    async fn get_all_by_user(&self, user_id: i32) -> Result<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .ratings
                .values()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn get_all_by_media(&self, media_id: i32) -> Result<Vec<Rating>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .ratings
                .values()
                .filter(|r| r.media_id == media_id)
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, rating: &Rating) -> Result<Option<Rating>> {
        self.rating_saves.fetch_add(1, Ordering::SeqCst);
        if self.saves_rejected() {
            return Ok(None);
        }

        let mut tables = self.tables.write().await;
        if rating.id == 0 {
            // unique (user_id, media_id)
            let duplicate = tables
                .ratings
                .values()
                .any(|r| r.user_id == rating.user_id && r.media_id == rating.media_id);
            if duplicate {
                return Ok(None);
            }
            tables.next_rating_id += 1;
            let mut saved = rating.clone();
            saved.id = tables.next_rating_id;
            tables.ratings.insert(saved.id, saved.clone());
            return Ok(Some(saved));
        }

        match tables.ratings.get_mut(&rating.id) {
            Some(stored) => {
                stored.stars = rating.stars;
                stored.comment = rating.comment.clone();
                stored.confirmed = rating.confirmed;
                Ok(Some(stored.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, rating: &Rating) -> Result<bool> {
        if self.deletes_rejected() {
            return Ok(false);
        }

        let mut tables = self.tables.write().await;
        let removed = tables.ratings.remove(&rating.id).is_some();
        tables.likes.retain(|(rating_id, _)| *rating_id != rating.id);
        Ok(removed)
    }

    async fn confirm(&self, rating_id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.ratings.get_mut(&rating_id) {
            Some(rating) => {
                rating.confirmed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn like(&self, rating_id: i32, user_id: i32) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.ratings.contains_key(&rating_id) {
            return Ok(false);
        }
        Ok(tables.likes.insert((rating_id, user_id)))
    }

    async fn like_count(&self, rating_id: i32) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables.likes.iter().filter(|(r, _)| *r == rating_id).count() as i64)
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn is_favorite(&self, user_id: i32, media_id: i32) -> Result<bool> {
        Ok(self
            .tables
            .read()
            .await
            .favorites
            .contains_key(&(user_id, media_id)))
    }

    async fn add(&self, favorite: &Favorite) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let key = (favorite.user_id, favorite.media_id);
        if tables.favorites.contains_key(&key) {
            return Ok(false);
        }
        tables.favorites.insert(key, favorite.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: i32, media_id: i32) -> Result<bool> {
        if self.deletes_rejected() {
            return Ok(false);
        }

        Ok(self
            .tables
            .write()
            .await
            .favorites
            .remove(&(user_id, media_id))
            .is_some())
    }

    async fn get_user_favorites(&self, user_id: i32) -> Result<Vec<Media>> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .filter_map(|(_, media_id)| tables.media.get(media_id).cloned())
            .collect())
    }

    async fn favorite_count_for_media(&self, media_id: i32) -> Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .keys()
            .filter(|(_, mid)| *mid == media_id)
            .count() as i64)
    }
}

#[async_trait]
impl LeaderboardStore for MemoryStore {
    async fn most_active_users(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<LeaderboardEntry> = tables
            .users
            .values()
            .map(|user| {
                let rating_count =
                    tables.ratings.values().filter(|r| r.user_id == user.id).count() as i64;
                let favorite_count =
                    tables.favorites.keys().filter(|(uid, _)| *uid == user.id).count() as i64;
                let media_created_count =
                    tables.media.values().filter(|m| m.creator_id == user.id).count() as i64;
                LeaderboardEntry {
                    user_id: user.id,
                    username: user.username.clone(),
                    rating_count,
                    favorite_count,
                    media_created_count,
                    activity_score: rating_count * 2 + favorite_count + media_created_count * 3,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.activity_score.cmp(&a.activity_score));
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn top_rated_media(&self, limit: i64) -> Result<Vec<TopRatedMedia>> {
        let tables = self.tables.read().await;
        let mut top: Vec<TopRatedMedia> = tables
            .media
            .values()
            .filter_map(|media| {
                let stars: Vec<i32> = tables
                    .ratings
                    .values()
                    .filter(|r| r.media_id == media.id)
                    .map(|r| r.stars)
                    .collect();
                if stars.len() < 2 {
                    return None;
                }
                let average = stars.iter().sum::<i32>() as f64 / stars.len() as f64;
                Some(TopRatedMedia {
                    media_id: media.id,
                    title: media.title.clone(),
                    media_type: media.media_type.to_string(),
                    release_year: media.release_year,
                    average_rating: average,
                    rating_count: stars.len() as i64,
                })
            })
            .collect();

        top.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then(b.rating_count.cmp(&a.rating_count))
        });
        top.truncate(limit.max(0) as usize);
        Ok(top)
    }

    async fn most_liked_ratings(&self, limit: i64) -> Result<Vec<MostLikedRating>> {
        let tables = self.tables.read().await;
        let mut liked: Vec<(MostLikedRating, chrono::DateTime<Utc>)> = tables
            .ratings
            .values()
            .filter(|r| r.confirmed)
            .filter_map(|rating| {
                let media = tables.media.get(&rating.media_id)?;
                let author = tables.users.get(&rating.user_id)?;
                let like_count =
                    tables.likes.iter().filter(|(rid, _)| *rid == rating.id).count() as i64;
                Some((
                    MostLikedRating {
                        rating_id: rating.id,
                        stars: rating.stars,
                        comment: rating.comment.clone(),
                        media_title: media.title.clone(),
                        author_name: author.username.clone(),
                        like_count,
                    },
                    rating.created_at,
                ))
            })
            .collect();

        liked.sort_by(|(a, a_created), (b, b_created)| {
            b.like_count
                .cmp(&a.like_count)
                .then(b_created.cmp(a_created))
        });
        Ok(liked
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(rating, _)| rating)
            .collect())
    }

    async fn trending_genres(&self) -> Result<Vec<String>> {
        let tables = self.tables.read().await;
        let since = Utc::now() - Duration::days(7);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for rating in tables.ratings.values().filter(|r| r.created_at >= since) {
            if let Some(media) = tables.media.get(&rating.media_id) {
                for genre in &media.genres {
                    *counts.entry(genre.as_str()).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(a_name, a), (b_name, b)| b.cmp(a).then(a_name.cmp(b_name)));
        Ok(ranked
            .into_iter()
            .take(5)
            .map(|(genre, _)| genre.to_string())
            .collect())
    }
}
