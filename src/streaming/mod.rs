//! Media streaming module.
//!
//! Serves HLS manifests and segments straight from the media root.
//!
//! # Routes
//!
//! Every path not claimed by another route lands in [`serve_resource`]:
//! - `GET /<path>.m3u8` - Manifest, `application/vnd.apple.mpegurl`
//! - `GET /<path>.ts` - Segment, `video/mp2t`
//! - `GET /<anything else>` - Static directory lookup, 404 when absent
//!
//! Range requests are honoured for all of them.

mod direct;
mod hls;
mod resolver;

pub use direct::{file_response, serve_static, ByteRange};
pub use hls::serve_media;
pub use resolver::{MediaFile, MediaRoot, ResourceKind, ResourceRequest};

use axum::{
    extract::{OriginalUri, State},
    http::{HeaderMap, Method},
    response::Response,
};

use crate::error::{Error, Result};
use crate::server::AppContext;

/// Fallback handler: classify the path and serve it or answer 404.
pub async fn serve_resource(
    State(ctx): State<AppContext>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Response> {
    if method != Method::GET && method != Method::HEAD {
        return Err(Error::not_found(uri.path()));
    }

    let request = ResourceRequest::from_uri_path(uri.path())?;

    match request.kind() {
        ResourceKind::Manifest | ResourceKind::Segment => {
            serve_media(&ctx.media_root, &request, &headers).await
        }
        ResourceKind::Other => match &ctx.static_root {
            Some(root) => serve_static(root, &request.path, &headers).await,
            None => Err(Error::not_found(&request.path)),
        },
    }
}
