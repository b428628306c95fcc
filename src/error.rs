use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the whole API surface. Every handler returns this so
/// the status mapping lives in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, tampered or expired access token. Always 401 with
    /// a uniform message so the rejection never reveals which check failed.
    #[error("{0}")]
    Authentication(String),
    /// Valid identity, insufficient role or ownership.
    #[error("{0}")]
    Authorization(String),
    /// Reset token malformed, expired, wrong purpose or already redeemed.
    #[error("Invalid or expired reset token")]
    InvalidToken,
    /// Old password mismatch on direct change.
    #[error("Invalid old password")]
    WrongPassword,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Email delivery failed")]
    Delivery(#[source] anyhow::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn authentication() -> Self {
        Self::Authentication("Invalid or expired token".into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::InvalidToken | Self::WrongPassword | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Delivery(e) => {
                error!(error = %e, "email delivery failed");
                StatusCode::BAD_GATEWAY
            }
            Self::Internal(e) => {
                error!(error = %e, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));

        if matches!(self, Self::Authentication(_)) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::authentication(), StatusCode::UNAUTHORIZED),
            (
                ApiError::Authorization("denied".into()),
                StatusCode::FORBIDDEN,
            ),
            (ApiError::InvalidToken, StatusCode::BAD_REQUEST),
            (ApiError::WrongPassword, StatusCode::BAD_REQUEST),
            (ApiError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("dup".into()), StatusCode::CONFLICT),
            (
                ApiError::Delivery(anyhow::anyhow!("smtp down")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn authentication_sets_www_authenticate() {
        let res = ApiError::authentication().into_response();
        assert_eq!(
            res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn internal_body_is_generic() {
        let err = ApiError::Internal(anyhow::anyhow!("secret detail"));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
