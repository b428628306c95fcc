use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::{access::Access, extractors::CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{DishCreate, DishUpdate};
use super::repo::{self, Dish};

pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", post(create_dish))
        .route("/dishes/restaurant/:restaurant_id", get(list_dishes))
        .route("/dishes/:id", put(update_dish).delete(delete_dish))
}

#[instrument(skip(state, caller))]
pub async fn list_dishes(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<Dish>>, ApiError> {
    Access::RestaurantOwner { restaurant_id }.check(&caller)?;
    Ok(Json(repo::list_by_restaurant(&state.db, restaurant_id).await?))
}

#[instrument(skip(state, caller, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<DishCreate>,
) -> Result<(StatusCode, Json<Dish>), ApiError> {
    Access::RestaurantOwner {
        restaurant_id: payload.restaurant_id,
    }
    .check(&caller)?;

    if payload.price.is_sign_negative() {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }

    let dish = repo::create(&state.db, &payload).await?;
    info!(dish_id = dish.id, restaurant_id = dish.restaurant_id, "dish created");
    Ok((StatusCode::CREATED, Json(dish)))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_dish(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(payload): Json<DishUpdate>,
) -> Result<Json<Dish>, ApiError> {
    let dish = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dish not found".into()))?;
    Access::RestaurantOwner {
        restaurant_id: dish.restaurant_id,
    }
    .check(&caller)?;

    if payload.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }

    let updated = repo::update_partial(&state.db, id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dish not found".into()))?;
    info!(dish_id = updated.id, "dish updated");
    Ok(Json(updated))
}

#[instrument(skip(state, caller))]
pub async fn delete_dish(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let dish = repo::get(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Dish not found".into()))?;
    Access::RestaurantOwner {
        restaurant_id: dish.restaurant_id,
    }
    .check(&caller)?;

    repo::delete(&state.db, id).await?;
    info!(dish_id = id, "dish deleted");
    Ok(StatusCode::NO_CONTENT)
}
