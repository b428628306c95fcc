use crate::state::AppState;
use axum::Router;

pub mod handlers;
mod services;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::image_routes())
}
