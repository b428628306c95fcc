use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::{access::Access, dto::normalize_email, extractors::CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::RestaurantUpdate;
use super::repo::{self, Restaurant, RestaurantWithOwner};

pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/:email",
            get(get_restaurant).put(update_restaurant),
        )
}

#[instrument(skip(state, caller))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<RestaurantWithOwner>>, ApiError> {
    Access::SuperuserOnly.check(&caller)?;
    Ok(Json(repo::list_with_owners(&state.db).await?))
}

/// A restaurant is addressed by its owner's email; the owner or a superuser
/// may read it.
#[instrument(skip(state, caller))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let email = normalize_email(&email);
    Access::AccountOwner { email: &email }.check(&caller)?;

    let restaurant = repo::find_by_owner_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;
    Ok(Json(restaurant))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(email): Path<String>,
    Json(payload): Json<RestaurantUpdate>,
) -> Result<Json<Restaurant>, ApiError> {
    let email = normalize_email(&email);
    Access::AccountOwner { email: &email }.check(&caller)?;

    let restaurant = repo::find_by_owner_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;

    let updated = repo::update_partial(&state.db, restaurant.id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Restaurant not found".into()))?;

    info!(restaurant_id = updated.id, owner = %email, "restaurant updated");
    Ok(Json(updated))
}
