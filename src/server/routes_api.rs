//! JSON API routes.

use axum::{extract::State, routing::get, Json, Router};

use super::{method_not_found, AppContext};
use crate::video::VideoMetadata;

pub fn api_routes() -> Router<AppContext> {
    Router::new().route("/get_video", get(get_video).fallback(method_not_found))
}

/// Describe the one configured video.
///
/// Built fresh from read-only config on every call, so repeated requests
/// return identical bodies.
pub async fn get_video(State(ctx): State<AppContext>) -> Json<VideoMetadata> {
    Json(VideoMetadata::from(&ctx.config.video))
}
