//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user. Registration and credentials are owned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub favorite_genre: Option<String>,
    pub created_at: DateTime<Utc>,
}
