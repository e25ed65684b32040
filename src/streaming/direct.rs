//! File responses with HTTP range requests.
//!
//! Streams an already-opened [`MediaFile`] into a response body. The file
//! handle moves into the body stream, so it is closed as soon as the body
//! is dropped: after the last byte, on a read error, or when the client
//! goes away mid-transfer.

use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::resolver::{MediaFile, MediaRoot};
use crate::error::Result;

/// Outcome of interpreting a `Range` header against a file length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRange {
    /// Inclusive byte span inside the file.
    Satisfiable { start: u64, end: u64 },
    /// Well-formed but entirely past the end of the file.
    Unsatisfiable,
}

/// Build a response for `media`, honouring a single-span `Range` header.
pub async fn file_response(
    media: MediaFile,
    content_type: &str,
    cache_control: &str,
    headers: &HeaderMap,
) -> Result<Response> {
    let MediaFile { mut file, len, .. } = media;

    let range = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| parse_range_header(s, len));

    match range {
        Some(ByteRange::Satisfiable { start, end }) => {
            let length = end - start + 1;

            file.seek(SeekFrom::Start(start)).await?;

            let stream = ReaderStream::new(file.take(length));
            let body = Body::from_stream(stream);

            Ok(Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, len),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CACHE_CONTROL, cache_control)
                .body(body)?)
        }
        Some(ByteRange::Unsatisfiable) => Ok(Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", len))
            .header(header::ACCEPT_RANGES, "bytes")
            .body(Body::empty())?),
        None => {
            let stream = ReaderStream::new(file);
            let body = Body::from_stream(stream);

            Ok(Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, len.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CACHE_CONTROL, cache_control)
                .body(body)?)
        }
    }
}

/// Serve a non-media path from the static directory.
///
/// Existence is checked for real here; a missing file is a 404.
pub async fn serve_static(root: &MediaRoot, path: &str, headers: &HeaderMap) -> Result<Response> {
    let media = root.open(path).await?;
    let content_type = static_content_type(path);
    file_response(media, content_type, "no-cache", headers).await
}

/// Parse HTTP Range header.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
///
/// Returns `None` when the header should be ignored (malformed or multi-range),
/// in which case the whole file is sent.
fn parse_range_header(header: &str, file_size: u64) -> Option<ByteRange> {
    let header = header.strip_prefix("bytes=")?;

    let (start, end) = header.split_once('-')?;
    let start = start.trim();
    let end = end.trim();

    match (start.is_empty(), end.is_empty()) {
        // bytes=-500 (last 500 bytes)
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            if suffix_len == 0 || file_size == 0 {
                return Some(ByteRange::Unsatisfiable);
            }
            let start = file_size.saturating_sub(suffix_len);
            Some(ByteRange::Satisfiable {
                start,
                end: file_size - 1,
            })
        }
        // bytes=500- (from 500 to end)
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return Some(ByteRange::Unsatisfiable);
            }
            Some(ByteRange::Satisfiable {
                start,
                end: file_size - 1,
            })
        }
        // bytes=0-499
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start > end {
                return None;
            }
            if start >= file_size {
                return Some(ByteRange::Unsatisfiable);
            }
            Some(ByteRange::Satisfiable {
                start,
                end: end.min(file_size - 1),
            })
        }
        // bytes=- (invalid)
        (true, true) => None,
    }
}

/// Guess a content type for static assets from the path extension.
fn static_content_type(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfiable(start: u64, end: u64) -> Option<ByteRange> {
        Some(ByteRange::Satisfiable { start, end })
    }

    #[test]
    fn test_parse_range_header_full_range() {
        assert_eq!(parse_range_header("bytes=0-499", 1000), satisfiable(0, 499));
    }

    #[test]
    fn test_parse_range_header_open_end() {
        assert_eq!(parse_range_header("bytes=500-", 1000), satisfiable(500, 999));
    }

    #[test]
    fn test_parse_range_header_suffix() {
        assert_eq!(parse_range_header("bytes=-200", 1000), satisfiable(800, 999));
        assert_eq!(parse_range_header("bytes=-5000", 1000), satisfiable(0, 999));
    }

    #[test]
    fn test_parse_range_header_clamped() {
        assert_eq!(parse_range_header("bytes=0-2000", 1000), satisfiable(0, 999));
    }

    #[test]
    fn test_parse_range_header_past_end() {
        assert_eq!(
            parse_range_header("bytes=1500-", 1000),
            Some(ByteRange::Unsatisfiable)
        );
        assert_eq!(
            parse_range_header("bytes=1000-1200", 1000),
            Some(ByteRange::Unsatisfiable)
        );
    }

    #[test]
    fn test_parse_range_header_empty_file() {
        assert_eq!(
            parse_range_header("bytes=-10", 0),
            Some(ByteRange::Unsatisfiable)
        );
        assert_eq!(
            parse_range_header("bytes=0-", 0),
            Some(ByteRange::Unsatisfiable)
        );
    }

    #[test]
    fn test_parse_range_header_ignored_forms() {
        assert_eq!(parse_range_header("bytes=-", 1000), None);
        assert_eq!(parse_range_header("bytes=abc-def", 1000), None);
        assert_eq!(parse_range_header("bytes=0-1,5-6", 1000), None);
        assert_eq!(parse_range_header("bytes=500-100", 1000), None);
        assert_eq!(parse_range_header("items=0-10", 1000), None);
    }

    #[test]
    fn test_static_content_type() {
        assert_eq!(static_content_type("/index.html"), "text/html; charset=utf-8");
        assert_eq!(static_content_type("/app.JS"), "text/javascript");
        assert_eq!(static_content_type("/clip.mp4"), "video/mp4");
        assert_eq!(static_content_type("/README"), "application/octet-stream");
    }
}
