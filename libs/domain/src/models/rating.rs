//! Rating model and the comment visibility rule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

/// Rating entity
///
/// Stars are always public. A comment is public only once `confirmed` is set;
/// until then it is visible to its author alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i32,
    pub media_id: i32,
    pub user_id: i32,
    pub stars: i32,
    pub comment: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Build an unsaved rating. A rating without comment needs no confirmation.
    pub fn new(media_id: i32, user_id: i32, stars: i32, comment: Option<String>) -> Self {
        let confirmed = !has_text(comment.as_deref());
        Self {
            id: 0,
            media_id,
            user_id,
            stars,
            comment,
            confirmed,
            created_at: Utc::now(),
        }
    }

    pub fn has_comment(&self) -> bool {
        has_text(self.comment.as_deref())
    }

    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.user_id == user_id
    }

    /// Return a copy carrying the new stars and comment.
    ///
    /// Any textual change of the comment, including to or from `None`,
    /// drops the confirmation; a stars-only edit keeps it.
    pub fn revised(&self, stars: i32, comment: Option<String>) -> Self {
        let comment_changed = self.comment != comment;
        Self {
            stars,
            confirmed: self.confirmed && !comment_changed,
            comment,
            ..self.clone()
        }
    }

    /// Apply the visibility rule for `requesting_user_id`
    pub fn visible_to(self, requesting_user_id: Option<i32>) -> Self {
        if self.confirmed || requesting_user_id == Some(self.user_id) {
            self
        } else {
            Self {
                comment: None,
                ..self
            }
        }
    }
}

fn has_text(comment: Option<&str>) -> bool {
    comment.is_some_and(|c| !c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rating_confirmation() {
        assert!(Rating::new(1, 2, 5, None).confirmed);
        assert!(Rating::new(1, 2, 5, Some("   ".to_string())).confirmed);
        assert!(!Rating::new(1, 2, 5, Some("great".to_string())).confirmed);
    }

    #[test]
    fn test_revised_stars_only_keeps_confirmation() {
        let mut rating = Rating::new(1, 2, 3, Some("ok".to_string()));
        rating.confirmed = true;

        let revised = rating.revised(5, Some("ok".to_string()));
        assert!(revised.confirmed);
        assert_eq!(revised.stars, 5);
    }

    #[test]
    fn test_revised_comment_change_drops_confirmation() {
        let confirmed = Rating::new(1, 2, 3, None);
        assert!(confirmed.confirmed);

        assert!(!confirmed.revised(3, Some("now with text".to_string())).confirmed);

        let mut commented = Rating::new(1, 2, 3, Some("text".to_string()));
        commented.confirmed = true;
        assert!(!commented.revised(3, None).confirmed);
        assert!(!commented.revised(3, Some("other".to_string())).confirmed);
    }

    #[test]
    fn test_revised_never_confirms() {
        let pending = Rating::new(1, 2, 4, Some("nice".to_string()));
        assert!(!pending.revised(4, Some("nice".to_string())).confirmed);
    }

    #[test]
    fn test_visible_to() {
        let rating = Rating::new(1, 2, 4, Some("nice".to_string()));

        let anonymous = rating.clone().visible_to(None);
        assert_eq!(anonymous.comment, None);
        assert_eq!(anonymous.stars, 4);
        assert_eq!(anonymous.created_at, rating.created_at);

        assert_eq!(rating.clone().visible_to(Some(3)).comment, None);
        assert_eq!(
            rating.clone().visible_to(Some(2)).comment.as_deref(),
            Some("nice")
        );

        let mut confirmed = rating;
        confirmed.confirmed = true;
        assert_eq!(confirmed.visible_to(None).comment.as_deref(), Some("nice"));
    }
}
