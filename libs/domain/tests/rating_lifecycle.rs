//! Rating lifecycle and comment visibility against the in-memory store

mod support;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use domain::memory::MemoryStore;
use domain::models::Rating;
use domain::store::RatingStore;
use domain::{EngineError, ErrorKind, RatingEngine};
use support::Fixture;

/// Rating store whose rows disappear right before an update is written
struct VanishingRatings(Arc<MemoryStore>);

#[async_trait]
impl RatingStore for VanishingRatings {
    async fn get_by_id(&self, id: i32) -> Result<Option<Rating>> {
        RatingStore::get_by_id(self.0.as_ref(), id).await
    }

    async fn get_by_user_and_media(&self, user_id: i32, media_id: i32) -> Result<Option<Rating>> {
        self.0.get_by_user_and_media(user_id, media_id).await
    }

    async fn get_all_by_user(&self, user_id: i32) -> Result<Vec<Rating>> {
        self.0.get_all_by_user(user_id).await
    }

    async fn get_all_by_media(&self, media_id: i32) -> Result<Vec<Rating>> {
        self.0.get_all_by_media(media_id).await
    }

    async fn save(&self, rating: &Rating) -> Result<Option<Rating>> {
        if rating.id != 0 {
            RatingStore::delete(self.0.as_ref(), rating).await?;
        }
        RatingStore::save(self.0.as_ref(), rating).await
    }

    async fn delete(&self, rating: &Rating) -> Result<bool> {
        RatingStore::delete(self.0.as_ref(), rating).await
    }

    async fn confirm(&self, rating_id: i32) -> Result<bool> {
        self.0.confirm(rating_id).await
    }

    async fn like(&self, rating_id: i32, user_id: i32) -> Result<bool> {
        self.0.like(rating_id, user_id).await
    }

    async fn like_count(&self, rating_id: i32) -> Result<i64> {
        self.0.like_count(rating_id).await
    }
}

#[tokio::test]
async fn test_out_of_range_stars_never_reach_the_store() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;

    for stars in [-1, 0, 6, 10] {
        let err = fx
            .ratings
            .rate_media(media.id, user.id, stars, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
    assert_eq!(fx.store.rating_save_count(), 0);

    let rating = fx.ratings.rate_media(media.id, user.id, 3, None).await.unwrap();
    let saves = fx.store.rating_save_count();

    for stars in [0, 6] {
        let err = fx
            .ratings
            .update_rating(rating.id, stars, None, user.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
    assert_eq!(fx.store.rating_save_count(), saves);
}

#[tokio::test]
async fn test_rate_media_requires_existing_media_and_user() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;

    let err = fx.ratings.rate_media(999, user.id, 4, None).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Media", id: 999 }));

    let err = fx.ratings.rate_media(media.id, 999, 4, None).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "User", id: 999 }));
}

#[tokio::test]
async fn test_second_rating_for_same_pair_conflicts() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;

    fx.ratings.rate_media(media.id, user.id, 4, None).await.unwrap();
    let err = fx
        .ratings
        .rate_media(media.id, user.id, 2, Some("changed my mind".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn test_failed_save_is_internal() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;

    fx.store.reject_saves(true);
    let err = fx.ratings.rate_media(media.id, user.id, 4, None).await.unwrap_err();
    assert!(matches!(err, EngineError::Internal(_)));
}

#[tokio::test]
async fn test_failed_update_is_internal() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;
    let rating = fx
        .ratings
        .rate_media(media.id, user.id, 4, Some("Tense".to_string()))
        .await
        .unwrap();

    fx.store.reject_saves(true);
    let err = fx
        .ratings
        .update_rating(rating.id, 2, None, user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Internal(ref msg) if msg == "Failed to update rating"));

    fx.store.reject_saves(false);
    let stored = fx.ratings.get_rating(rating.id).await.unwrap();
    assert_eq!(stored.stars, 4);
    assert_eq!(stored.comment.as_deref(), Some("Tense"));
}

#[tokio::test]
async fn test_update_of_rating_deleted_before_save_is_internal() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;
    let rating = fx.ratings.rate_media(media.id, user.id, 4, None).await.unwrap();

    let engine = RatingEngine::new(
        Arc::new(VanishingRatings(fx.store.clone())),
        fx.store.clone(),
        fx.store.clone(),
    );
    let err = engine.update_rating(rating.id, 5, None, user.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Internal(_)));
    assert_eq!(
        fx.ratings.get_rating(rating.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_delete_not_applied_by_store_is_internal() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Heat", &["crime"]).await;
    let rating = fx.ratings.rate_media(media.id, user.id, 4, None).await.unwrap();

    fx.store.reject_deletes(true);
    let err = fx.ratings.delete_rating(rating.id, user.id).await.unwrap_err();
    assert!(matches!(err, EngineError::Internal(ref msg) if msg == "Failed to delete rating"));
    assert_eq!(fx.ratings.get_rating(rating.id).await.unwrap(), rating);
}

#[tokio::test]
async fn test_scenario_rating_without_comment_is_confirmed() {
    let fx = Fixture::new();
    let user = fx.user("alice").await;
    let media = fx.media(&user, "Mad Max", &["action"]).await;

    let rating = fx.ratings.rate_media(media.id, user.id, 5, None).await.unwrap();
    assert!(rating.confirmed);
    assert_eq!(rating.comment, None);

    let mine = fx.ratings.get_ratings_by_user(user.id).await.unwrap();
    assert_eq!(mine, vec![rating]);
}

#[tokio::test]
async fn test_scenario_unconfirmed_comment_hidden_from_others() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let other = fx.user("bob").await;
    let media = fx.media(&author, "Mad Max", &["action"]).await;

    let rating = fx
        .ratings
        .rate_media(media.id, author.id, 4, Some("nice".to_string()))
        .await
        .unwrap();
    assert!(!rating.confirmed);

    let seen_by_other = fx
        .ratings
        .get_public_rating(rating.id, Some(other.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen_by_other.comment, None);
    assert_eq!(seen_by_other.stars, 4);
    assert_eq!(seen_by_other.id, rating.id);
    assert!(!seen_by_other.confirmed);
    assert_eq!(seen_by_other.created_at, rating.created_at);

    let anonymous = fx
        .ratings
        .get_public_rating(rating.id, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(anonymous.comment, None);

    let seen_by_author = fx
        .ratings
        .get_public_rating(rating.id, Some(author.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(seen_by_author.comment.as_deref(), Some("nice"));

    // the stored rating is untouched by the read-time filter
    let stored = fx.ratings.get_rating(rating.id).await.unwrap();
    assert_eq!(stored.comment.as_deref(), Some("nice"));

    // unchanged comment keeps it pending
    let updated = fx
        .ratings
        .update_rating(rating.id, 4, Some("nice".to_string()), author.id)
        .await
        .unwrap();
    assert!(!updated.confirmed);
}

#[tokio::test]
async fn test_public_rating_of_unknown_id_is_none() {
    let fx = Fixture::new();
    assert!(fx.ratings.get_public_rating(42, None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_confirmed_comment_visible_to_everyone() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let other = fx.user("bob").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;

    let rating = fx
        .ratings
        .rate_media(media.id, author.id, 5, Some("terrifying".to_string()))
        .await
        .unwrap();
    assert!(fx.ratings.confirm_rating(rating.id, author.id).await.unwrap());

    for requester in [None, Some(other.id), Some(author.id)] {
        let seen = fx
            .ratings
            .get_public_rating(rating.id, requester)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(seen.comment.as_deref(), Some("terrifying"));
        assert!(seen.confirmed);
    }
}

#[tokio::test]
async fn test_update_rating_confirmation_transitions() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;

    let rating = fx
        .ratings
        .rate_media(media.id, author.id, 3, Some("good".to_string()))
        .await
        .unwrap();
    fx.ratings.confirm_rating(rating.id, author.id).await.unwrap();

    // stars-only edit keeps confirmation
    let edited = fx
        .ratings
        .update_rating(rating.id, 5, Some("good".to_string()), author.id)
        .await
        .unwrap();
    assert!(edited.confirmed);
    assert_eq!(edited.stars, 5);

    // comment text change resets it
    let edited = fx
        .ratings
        .update_rating(rating.id, 5, Some("great".to_string()), author.id)
        .await
        .unwrap();
    assert!(!edited.confirmed);

    fx.ratings.confirm_rating(rating.id, author.id).await.unwrap();

    // removing the comment counts as a change
    let edited = fx
        .ratings
        .update_rating(rating.id, 5, None, author.id)
        .await
        .unwrap();
    assert!(!edited.confirmed);
    assert_eq!(edited.comment, None);
}

#[tokio::test]
async fn test_adding_comment_to_confirmed_rating_resets_confirmation() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;

    let rating = fx.ratings.rate_media(media.id, author.id, 4, None).await.unwrap();
    assert!(rating.confirmed);

    let edited = fx
        .ratings
        .update_rating(rating.id, 4, Some("x".to_string()), author.id)
        .await
        .unwrap();
    assert!(!edited.confirmed);
}

#[tokio::test]
async fn test_update_rating_owner_only() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let other = fx.user("bob").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;
    let rating = fx.ratings.rate_media(media.id, author.id, 4, None).await.unwrap();

    let err = fx
        .ratings
        .update_rating(rating.id, 1, None, other.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = fx.ratings.update_rating(777, 1, None, author.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_confirm_rating_preconditions() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let other = fx.user("bob").await;
    let first = fx.media(&author, "Alien", &["horror"]).await;
    let second = fx.media(&author, "Aliens", &["action"]).await;

    let silent = fx.ratings.rate_media(first.id, author.id, 4, None).await.unwrap();
    let err = fx.ratings.confirm_rating(silent.id, author.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(ref msg) if msg == "No comment to confirm"));

    let blank = fx
        .ratings
        .rate_media(second.id, author.id, 4, Some("   ".to_string()))
        .await
        .unwrap();
    assert!(blank.confirmed);
    let err = fx.ratings.confirm_rating(blank.id, author.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let third = fx.media(&author, "Alien 3", &["horror"]).await;
    let commented = fx
        .ratings
        .rate_media(third.id, author.id, 2, Some("meh".to_string()))
        .await
        .unwrap();

    let err = fx.ratings.confirm_rating(commented.id, other.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    assert!(fx.ratings.confirm_rating(commented.id, author.id).await.unwrap());
    let err = fx.ratings.confirm_rating(commented.id, author.id).await.unwrap_err();
    assert!(
        matches!(err, EngineError::InvalidState(ref msg) if msg == "Comment is already confirmed")
    );

    let err = fx.ratings.confirm_rating(404, author.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_rating_owner_only() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let other = fx.user("bob").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;
    let rating = fx.ratings.rate_media(media.id, author.id, 4, None).await.unwrap();

    let err = fx.ratings.delete_rating(rating.id, other.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    fx.ratings.delete_rating(rating.id, author.id).await.unwrap();
    let err = fx.ratings.delete_rating(rating.id, author.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // the pair can be rated again once deleted
    assert!(fx.ratings.rate_media(media.id, author.id, 2, None).await.is_ok());
}

#[tokio::test]
async fn test_likes() {
    let fx = Fixture::new();
    let author = fx.user("alice").await;
    let fan = fx.user("bob").await;
    let media = fx.media(&author, "Alien", &["horror"]).await;
    let rating = fx.ratings.rate_media(media.id, author.id, 4, None).await.unwrap();

    let err = fx.ratings.like_rating(rating.id, author.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let err = fx.ratings.like_rating(rating.id, 999).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "User", .. }));

    let err = fx.ratings.like_rating(999, fan.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { entity: "Rating", .. }));

    assert!(fx.ratings.like_rating(rating.id, fan.id).await.unwrap());
    assert_eq!(fx.ratings.get_rating_like_count(rating.id).await.unwrap(), 1);

    // duplicate like is absorbed by the store
    assert!(!fx.ratings.like_rating(rating.id, fan.id).await.unwrap());
    assert_eq!(fx.ratings.get_rating_like_count(rating.id).await.unwrap(), 1);

    let err = fx.ratings.get_rating_like_count(999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_media_ratings_apply_visibility_per_rating() {
    let fx = Fixture::new();
    let alice = fx.user("alice").await;
    let bob = fx.user("bob").await;
    let media = fx.media(&alice, "Alien", &["horror"]).await;

    fx.ratings
        .rate_media(media.id, alice.id, 5, Some("classic".to_string()))
        .await
        .unwrap();
    fx.ratings
        .rate_media(media.id, bob.id, 3, Some("slow".to_string()))
        .await
        .unwrap();

    let seen_by_bob = fx.ratings.get_media_ratings(media.id, Some(bob.id)).await.unwrap();
    assert_eq!(seen_by_bob.len(), 2);
    for rating in &seen_by_bob {
        if rating.user_id == bob.id {
            assert_eq!(rating.comment.as_deref(), Some("slow"));
        } else {
            assert_eq!(rating.comment, None);
        }
    }

    let err = fx.ratings.get_media_ratings(999, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
