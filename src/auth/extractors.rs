use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the caller from the bearer token: verify, then load the user row
/// so policy checks see the fresh role. Every failure is the same 401.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::authentication)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(token).map_err(|e| {
            warn!("invalid or expired token");
            e
        })?;

        let user = User::find_by_email(&state.db, &claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                warn!(email = %claims.sub, "token subject no longer exists");
                ApiError::authentication()
            })?;

        Ok(CurrentUser(user))
    }
}

/// Like [`CurrentUser`] but never rejects; login and register use it to
/// refuse callers that are already authenticated.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(MaybeUser(None));
        };

        let keys = JwtKeys::from_ref(state);
        let Ok(claims) = keys.verify_access(token) else {
            return Ok(MaybeUser(None));
        };

        let user = User::find_by_email(&state.db, &claims.sub)
            .await
            .ok()
            .flatten();
        Ok(MaybeUser(user))
    }
}

fn bearer_token<'a>(parts: &'a Parts) -> Option<&'a str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
}
