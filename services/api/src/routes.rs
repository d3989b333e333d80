//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::WithRejection;
use domain::EngineError;
use domain::leaderboard::DEFAULT_LEADERBOARD_LIMIT;
use domain::models::{MediaChanges, NewMedia};
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, MaybeUser, auth_middleware},
    models::{LikeCountResponse, LimitQuery, RateRequest, RecommendationKind, RecommendationQuery},
    state::AppState,
};

/// Extractors whose rejections are answered with the JSON error body
type IdPath = WithRejection<Path<i32>, ApiError>;
type JsonBody<T> = WithRejection<Json<T>, ApiError>;
type QueryParams<T> = WithRejection<Query<T>, ApiError>;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/media", post(create_media))
        .route("/media/:id", put(update_media).delete(delete_media))
        .route("/media/:id/rate", post(rate_media))
        .route(
            "/media/:id/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route("/ratings/:id", put(update_rating).delete(delete_rating))
        .route("/ratings/:id/confirm", post(confirm_rating))
        .route("/ratings/:id/like", post(like_rating))
        .route("/users/:id/ratings", get(get_user_ratings))
        .route("/users/:id/favorites", get(get_user_favorites))
        .route("/users/:id/recommendations", get(get_recommendations))
        .route("/users/:id/profile", get(get_user_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/media", get(list_media))
        .route("/media/:id", get(get_media))
        .route("/media/:id/ratings", get(get_media_ratings))
        .route("/ratings/:id", get(get_rating))
        .route("/ratings/:id/likes", get(get_like_count))
        .route("/users/:id/media", get(get_media_by_creator))
        .route("/leaderboard/users", get(most_active_users))
        .route("/leaderboard/media", get(top_rated_media))
        .route("/leaderboard/ratings", get(most_liked_ratings))
        .route("/leaderboard/genres", get(trending_genres))
        .merge(protected_routes)
        .with_state(state)
}

/// Personal listings are only served to their owner
fn ensure_self(user: &AuthUser, user_id: i32) -> ApiResult<()> {
    if user.id == user_id {
        Ok(())
    } else {
        Err(EngineError::Forbidden("Users can only access their own data".to_string()).into())
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "media-ratings-api"
    }))
}

pub async fn list_media(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.list_media().await?))
}

pub async fn get_media(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.get_media(id).await?))
}

pub async fn get_media_by_creator(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.media_by_creator(id).await?))
}

pub async fn create_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): JsonBody<NewMedia>,
) -> ApiResult<impl IntoResponse> {
    let media = state.catalog.create_media(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(media)))
}

pub async fn update_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<MediaChanges>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.catalog.update_media(id, user.id, payload).await?))
}

pub async fn delete_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    state.catalog.delete_media(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Ratings of a media entry; pending comments are shown to their author only
pub async fn get_media_ratings(
    State(state): State<AppState>,
    caller: MaybeUser,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.ratings.get_media_ratings(id, caller.id()).await?))
}

pub async fn rate_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<RateRequest>,
) -> ApiResult<impl IntoResponse> {
    let rating = state
        .ratings
        .rate_media(id, user.id, payload.stars, payload.comment)
        .await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn get_rating(
    State(state): State<AppState>,
    caller: MaybeUser,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let rating = state
        .ratings
        .get_public_rating(id, caller.id())
        .await?
        .ok_or_else(|| ApiError::from(EngineError::not_found("Rating", id)))?;
    Ok(Json(rating))
}

pub async fn update_rating(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(payload), _): JsonBody<RateRequest>,
) -> ApiResult<impl IntoResponse> {
    let rating = state
        .ratings
        .update_rating(id, payload.stars, payload.comment, user.id)
        .await?;
    Ok(Json(rating))
}

pub async fn delete_rating(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    state.ratings.delete_rating(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn confirm_rating(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let confirmed = state.ratings.confirm_rating(id, user.id).await?;
    Ok(Json(json!({ "confirmed": confirmed })))
}

pub async fn like_rating(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let liked = state.ratings.like_rating(id, user.id).await?;
    Ok(Json(json!({ "liked": liked })))
}

pub async fn get_like_count(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let like_count = state.ratings.get_rating_like_count(id).await?;
    Ok(Json(LikeCountResponse {
        rating_id: id,
        like_count,
    }))
}

pub async fn get_user_ratings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    ensure_self(&user, id)?;
    Ok(Json(state.ratings.get_ratings_by_user(id).await?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    let added = state.favorites.add_favorite(user.id, id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "favorite": added }))))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    if !state.favorites.remove_favorite(user.id, id).await? {
        return Err(EngineError::Internal("Failed to remove favorite".to_string()).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_user_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    ensure_self(&user, id)?;
    Ok(Json(state.favorites.get_user_favorites(id).await?))
}

/// Rating totals, created media and favorite genre of the caller
pub async fn get_user_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
) -> ApiResult<impl IntoResponse> {
    ensure_self(&user, id)?;
    Ok(Json(state.profiles.get_profile(id).await?))
}

/// `?type=genre|content&limit=n`, genre-based by default
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Query(query), _): QueryParams<RecommendationQuery>,
) -> ApiResult<impl IntoResponse> {
    ensure_self(&user, id)?;
    let limit = state.settings.recommendation_limit(query.limit);

    let media = match query.kind.unwrap_or(RecommendationKind::Genre) {
        RecommendationKind::Genre => {
            state
                .recommendations
                .get_genre_based_recommendations(id, limit)
                .await?
        }
        RecommendationKind::Content => {
            state
                .recommendations
                .get_content_based_recommendations(id, limit)
                .await?
        }
    };

    Ok(Json(media))
}

pub async fn most_active_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): QueryParams<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(state.leaderboard.most_active_users(limit).await?))
}

pub async fn top_rated_media(
    State(state): State<AppState>,
    WithRejection(Query(query), _): QueryParams<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(state.leaderboard.top_rated_media(limit).await?))
}

pub async fn most_liked_ratings(
    State(state): State<AppState>,
    WithRejection(Query(query), _): QueryParams<LimitQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(state.leaderboard.most_liked_ratings(limit).await?))
}

pub async fn trending_genres(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.leaderboard.trending_genres().await?))
}
