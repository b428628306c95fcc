use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{is_valid_email, normalize_email, AuthResponse, LoginRequest, RegisterRequest},
    extractors::MaybeUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::{Role, User},
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Public registration: creates an unapproved owner with a default
/// restaurant. A superuser must approve the account before login works.
#[instrument(skip(state, caller, payload))]
pub async fn register(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    if caller.is_some() {
        return Err(ApiError::Validation(
            "User is already authenticated. Please log out first.".into(),
        ));
    }

    payload.email = normalize_email(&payload.email);

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create_with_role(&state.db, &payload.email, &hash, Role::Owner).await?;

    info!(user_id = %user.id, email = %user.email, "owner registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, caller, payload))]
pub async fn login(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if caller.is_some() {
        return Err(ApiError::Validation(
            "User is already authenticated. Please log out first.".into(),
        ));
    }

    payload.email = normalize_email(&payload.email);

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Authentication("Invalid email or password".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Authentication("Invalid email or password".into()));
    }

    if !user.approved {
        warn!(email = %payload.email, user_id = %user.id, "login unapproved user");
        return Err(ApiError::Authorization("User is not approved".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(&user.email, user.role)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse::bearer(access_token, user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    #[test]
    fn auth_response_serialization() {
        let response = AuthResponse::bearer(
            "header.payload.signature".into(),
            User {
                id: Uuid::new_v4(),
                email: "owner@cafe.test".into(),
                password_hash: "secret-hash".into(),
                role: Role::Owner,
                approved: true,
                restaurant_id: Some(3),
                created_at: OffsetDateTime::now_utc(),
            },
        );

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("owner@cafe.test"));
        assert!(json.contains("\"token_type\":\"bearer\""));
        assert!(!json.contains("secret-hash"));
    }
}
