//! Favorite model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A media entry bookmarked by a user. Unique per (user, media) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub user_id: i32,
    pub media_id: i32,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(user_id: i32, media_id: i32) -> Self {
        Self {
            user_id,
            media_id,
            created_at: Utc::now(),
        }
    }
}
