use axum::{
    extract::{FromRef, Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::auth::{
    access::Access,
    dto::normalize_email,
    extractors::CurrentUser,
    jwt::{password_fingerprint, JwtKeys},
    password::{hash_password, verify_password},
    repo::User,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{ChangePasswordRequest, RedeemRequest, ResetQuery, ResetRequest};
use super::services::{landing_url, reset_email_body, reset_link, RESET_SUBJECT};

pub fn password_routes() -> Router<AppState> {
    Router::new()
        .route("/passwords/request-reset", post(request_reset))
        .route("/passwords/reset", get(reset_redirect).post(redeem_reset))
        .route("/passwords/change", post(change_password))
}

/// Start a reset flow. The response is identical whether or not the account
/// exists so the endpoint cannot be used to probe for registered emails;
/// only the existing-account path sends mail.
#[instrument(skip(state, payload))]
pub async fn request_reset(
    State(state): State<AppState>,
    Json(mut payload): Json<ResetRequest>,
) -> Result<Json<Value>, ApiError> {
    payload.email = normalize_email(&payload.email);
    let outcome = json!({
        "message": "If the account exists, a password reset email has been sent"
    });

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        info!(email = %payload.email, "reset requested for unknown email");
        return Ok(Json(outcome));
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_reset(&user.email, &user.password_hash)?;
    let link = reset_link(&state.config.public_base_url, &token);

    // Delivery failure surfaces; the token stays valid, re-requesting simply
    // issues a fresh one.
    state
        .mailer
        .send(&user.email, RESET_SUBJECT, &reset_email_body(&link))
        .await
        .map_err(ApiError::Delivery)?;

    info!(email = %user.email, "password reset email sent");
    Ok(Json(outcome))
}

/// Browser target of the emailed link: 302 to the configured landing page,
/// which collects the new password and posts it back here.
#[instrument(skip(state, query))]
pub async fn reset_redirect(
    State(state): State<AppState>,
    Query(query): Query<ResetQuery>,
) -> Redirect {
    Redirect::temporary(&landing_url(&state.config.reset_page_url, &query.token))
}

/// Redeem a reset token. The stored hash changing is what invalidates the
/// token, so a second redemption (or a sibling token issued against the old
/// hash) fails the fingerprint comparison.
#[instrument(skip(state, payload))]
pub async fn redeem_reset(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<Value>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_reset(&payload.token)?;

    let user = User::find_by_email(&state.db, &claims.sub)
        .await?
        .ok_or(ApiError::InvalidToken)?;

    if password_fingerprint(&user.password_hash) != claims.pwd {
        warn!(email = %user.email, "reset token already redeemed or superseded");
        return Err(ApiError::InvalidToken);
    }

    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    User::set_password_hash(&state.db, &user.email, &hash).await?;

    info!(email = %user.email, "password reset completed");
    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// Direct change for an authenticated caller: prove the old password, then
/// re-hash and persist. No mutation on mismatch.
#[instrument(skip(state, user, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    Access::Authenticated.check(&user)?;

    if !verify_password(&payload.old_password, &user.password_hash)? {
        warn!(email = %user.email, "password change with wrong old password");
        return Err(ApiError::WrongPassword);
    }

    if payload.new_password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    let hash = hash_password(&payload.new_password)?;
    User::set_password_hash(&state.db, &user.email, &hash).await?;

    info!(email = %user.email, "password changed");
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
