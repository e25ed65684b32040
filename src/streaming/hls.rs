//! HLS manifest and segment serving.
//!
//! Manifests and segments are plain files under the media root. Nothing is
//! cached between requests: a segment written to disk a moment ago is
//! served on the next request.

use axum::{http::HeaderMap, response::Response};

use super::direct;
use super::resolver::{MediaRoot, ResourceKind, ResourceRequest};
use crate::error::Result;

/// Serve a `.m3u8` or `.ts` file, or 404 when it cannot be opened.
pub async fn serve_media(
    root: &MediaRoot,
    request: &ResourceRequest,
    headers: &HeaderMap,
) -> Result<Response> {
    let kind = request.kind();
    let media = root.open(&request.path).await?;

    tracing::debug!(
        path = %media.path.display(),
        kind = ?kind,
        bytes = media.len,
        "Streaming media file"
    );

    direct::file_response(media, kind.content_type(), cache_control(kind), headers).await
}

fn cache_control(kind: ResourceKind) -> &'static str {
    match kind {
        // Playlists can grow while a stream is live.
        ResourceKind::Manifest => "no-cache",
        _ => "max-age=31536000",
    }
}
