use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::auth::{access::Access, extractors::CurrentUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::services::{is_allowed_extension, is_safe_filename, mime_for};

/// Served when the requested photo is missing or invalid.
const DEFAULT_PHOTO: &str = "default.jpeg";

pub fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/images", get(get_image))
        .route("/images/:restaurant_id", post(upload_image))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub restaurant_id: Option<i32>,
    pub photo: Option<String>,
}

/// Serve a restaurant photo from the static folder, falling back to the
/// default image when the photo is absent or the name is unsafe. Public:
/// photos appear in customer-facing menus.
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Response, ApiError> {
    let dir = &state.config.photo_dir;

    let requested = match (query.restaurant_id, query.photo.as_deref()) {
        (Some(id), Some(name)) if is_safe_filename(name) => {
            Some(dir.join(id.to_string()).join(name))
        }
        _ => None,
    };

    let (bytes, filename) = match &requested {
        Some(path) => match tokio::fs::read(path).await {
            Ok(bytes) => (bytes, query.photo.clone().unwrap_or_default()),
            Err(_) => {
                debug!(path = %path.display(), "photo not found, serving default");
                read_default(dir).await?
            }
        },
        None => read_default(dir).await?,
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime_for(&filename))],
        bytes,
    )
        .into_response())
}

async fn read_default(dir: &std::path::Path) -> Result<(Vec<u8>, String), ApiError> {
    let path = dir.join(DEFAULT_PHOTO);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("Default photo not found".into()))?;
    Ok((bytes, DEFAULT_PHOTO.to_string()))
}

/// Multipart upload of a restaurant photo; the file keeps its client-side
/// name after sanitization.
#[instrument(skip(state, caller, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(restaurant_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    Access::RestaurantOwner { restaurant_id }.check(&caller)?;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation("Filename is required".into()))?;
        if !is_safe_filename(&filename) {
            return Err(ApiError::Validation("Invalid filename".into()));
        }
        if !is_allowed_extension(&filename) {
            return Err(ApiError::Validation(format!(
                "File type of '{filename}' is not allowed"
            )));
        }

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("Failed to read file body".into()))?;

        let dir = state.config.photo_dir.join(restaurant_id.to_string());
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create photo dir {}", dir.display()))?;
        let destination = dir.join(&filename);
        tokio::fs::write(&destination, &data)
            .await
            .with_context(|| format!("write photo {}", destination.display()))?;

        info!(restaurant_id, filename = %filename, size = data.len(), "photo uploaded");
        return Ok(Json(json!({ "filename": filename })));
    }

    Err(ApiError::Validation("Multipart field 'file' is required".into()))
}
