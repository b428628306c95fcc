use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::auth::{
    access::Access,
    dto::{is_valid_email, normalize_email},
    extractors::CurrentUser,
    password::hash_password,
    repo::User,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{ApproveUserRequest, CreateUserRequest};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/approve", post(approve_user))
        .route("/users/:email", delete(delete_user))
}

#[instrument(skip(state, caller))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Access::SuperuserOnly.check(&caller)?;
    Ok(Json(User::list_all(&state.db).await?))
}

/// Superuser-created accounts carry an explicit role. Superusers start
/// approved; owners follow the registration rules (unapproved, default
/// restaurant).
#[instrument(skip(state, caller, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    Access::SuperuserOnly.check(&caller)?;

    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create_with_role(&state.db, &payload.email, &hash, payload.role).await?;

    info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, caller, payload))]
pub async fn approve_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<ApproveUserRequest>,
) -> Result<Json<Value>, ApiError> {
    Access::SuperuserOnly.check(&caller)?;

    let user = User::set_approved(&state.db, &normalize_email(&payload.email))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    info!(user_id = %user.id, email = %user.email, "user approved");
    Ok(Json(json!({ "message": "User approved successfully" })))
}

#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(email): Path<String>,
) -> Result<StatusCode, ApiError> {
    Access::SuperuserOnly.check(&caller)?;

    let email = normalize_email(&email);
    if !User::delete(&state.db, &email).await? {
        return Err(ApiError::NotFound("User not found".into()));
    }

    info!(email = %email, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
