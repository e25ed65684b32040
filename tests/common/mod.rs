//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which lays out a temporary media tree
//! (index document, one manifest pair and a few segments) and builds an
//! [`AppContext`] over it. The [`with_server`](TestHarness::with_server)
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use ratsnake::config::Config;
use ratsnake::server::{create_router, AppContext};

pub const INDEX_HTML: &str = "<!DOCTYPE html><html><body><video id=\"player\"></video></body></html>";

pub const MANIFEST: &str = "#EXTM3U\n\
#EXT-X-VERSION:3\n\
#EXT-X-TARGETDURATION:10\n\
#EXT-X-MEDIA-SEQUENCE:0\n\
#EXTINF:10.0,\n\
ayc0.ts\n\
#EXTINF:10.0,\n\
ayc1.ts\n\
#EXT-X-ENDLIST\n";

/// Test harness wrapping a fully-constructed [`AppContext`] over a
/// temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    /// Holds the temp tree alive for the duration of the test.
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a harness with the default fixture tree and no static dir.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Create a harness that also serves `<tmp>/public` as the static dir.
    pub fn with_static_dir() -> Self {
        Self::build(true)
    }

    fn build(static_dir: bool) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media = dir.path().join("media");
        std::fs::create_dir_all(media.join("videos")).unwrap();

        std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(media.join("videos/ayc.m3u8"), MANIFEST).unwrap();
        std::fs::write(media.join("videos/ayc-sample.m3u8"), MANIFEST).unwrap();
        for i in 0..4u8 {
            std::fs::write(
                media.join(format!("videos/ayc{i}.ts")),
                segment_bytes(i, 64 * 1024),
            )
            .unwrap();
        }

        // Outside the media root; must never be reachable.
        std::fs::write(dir.path().join("secret.ts"), b"top secret").unwrap();

        let mut config = Config::default();
        config.server.index_file = dir.path().join("index.html");
        config.media.root = media;
        if static_dir {
            let public = dir.path().join("public");
            std::fs::create_dir_all(&public).unwrap();
            std::fs::write(public.join("style.css"), "body { margin: 0; }").unwrap();
            config.server.static_dir = Some(public);
        }

        let ctx = AppContext::new(config).expect("failed to build context");
        Self { ctx, dir }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    pub fn media_path(&self, relative: &str) -> PathBuf {
        self.dir.path().join("media").join(relative)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Send one request through the router in-process.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Send a body-less GET through the router in-process.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Deterministic, per-segment-distinct payload.
pub fn segment_bytes(seed: u8, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed.wrapping_mul(97)))
        .collect()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}
