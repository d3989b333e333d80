//! Media model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Category of a media entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    #[serde(alias = "show")]
    Series,
    Game,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Game => "game",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" | "show" => Ok(MediaType::Series),
            "game" => Ok(MediaType::Game),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}

/// Media entity
///
/// `id` is 0 until the entry has been persisted; the store assigns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: i32,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub description: String,
    pub release_year: i32,
    pub age_restriction: i32,
    pub creator_id: i32,
    pub genres: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Media {
    /// Build an unsaved entry owned by `creator_id`
    pub fn new(creator_id: i32, new_media: NewMedia) -> Self {
        Self {
            id: 0,
            media_type: new_media.media_type,
            title: new_media.title.trim().to_string(),
            description: new_media.description,
            release_year: new_media.release_year,
            age_restriction: new_media.age_restriction,
            creator_id,
            genres: normalize_genres(new_media.genres),
            created_at: Utc::now(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Return a copy with the provided changes applied
    pub fn with_changes(&self, changes: MediaChanges) -> Self {
        let mut updated = self.clone();
        if let Some(media_type) = changes.media_type {
            updated.media_type = media_type;
        }
        if let Some(title) = changes.title {
            updated.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            updated.description = description;
        }
        if let Some(release_year) = changes.release_year {
            updated.release_year = release_year;
        }
        if let Some(age_restriction) = changes.age_restriction {
            updated.age_restriction = age_restriction;
        }
        if let Some(genres) = changes.genres {
            updated.genres = normalize_genres(genres);
        }
        updated
    }
}

/// New media creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMedia {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub release_year: i32,
    #[serde(default)]
    pub age_restriction: i32,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Media update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MediaChanges {
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub release_year: Option<i32>,
    pub age_restriction: Option<i32>,
    pub genres: Option<Vec<String>>,
}

/// Lowercase and trim genre labels, dropping blanks and duplicates
pub fn normalize_genres<I, S>(genres: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    genres
        .into_iter()
        .map(|genre| genre.as_ref().trim().to_lowercase())
        .filter(|genre| !genre.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_genres() {
        let genres = normalize_genres(["Action", " action ", "", "Sci-Fi", "  "]);
        let expected: BTreeSet<String> = ["action", "sci-fi"].iter().map(|g| g.to_string()).collect();
        assert_eq!(genres, expected);
    }

    #[test]
    fn test_media_type_parsing() {
        assert_eq!("Movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert_eq!("show".parse::<MediaType>(), Ok(MediaType::Series));
        assert_eq!(" GAME ".parse::<MediaType>(), Ok(MediaType::Game));
        assert!("podcast".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_with_changes_keeps_untouched_fields() {
        let media = Media::new(
            7,
            NewMedia {
                media_type: MediaType::Movie,
                title: "Heat".to_string(),
                description: "Crime".to_string(),
                release_year: 1995,
                age_restriction: 16,
                genres: vec!["Crime".to_string(), "Drama".to_string()],
            },
        );

        let updated = media.with_changes(MediaChanges {
            title: Some("  Heat (Director's Cut) ".to_string()),
            genres: Some(vec!["THRILLER".to_string()]),
            ..Default::default()
        });

        assert_eq!(updated.title, "Heat (Director's Cut)");
        assert_eq!(updated.release_year, 1995);
        assert_eq!(updated.creator_id, 7);
        assert!(updated.genres.contains("thriller"));
        assert_eq!(updated.genres.len(), 1);
        // the source entry is left as it was
        assert_eq!(media.title, "Heat");
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        let json = serde_json::to_string(&MediaType::Series).unwrap();
        assert_eq!(json, "\"series\"");
        let parsed: MediaType = serde_json::from_str("\"show\"").unwrap();
        assert_eq!(parsed, MediaType::Series);
    }
}
