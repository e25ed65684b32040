//! Request-path to file-system mapping.
//!
//! Paths are classified purely by their trailing extension, then resolved
//! under a fixed root. Resolution refuses anything that would land outside
//! the root, whether through `..` segments or symlinks.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;

use crate::error::{Error, Result};

/// What kind of resource a request path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// HLS playlist (`.m3u8`).
    Manifest,
    /// MPEG transport stream chunk (`.ts`).
    Segment,
    /// Anything else; handled by the static layer.
    Other,
}

impl ResourceKind {
    /// Classify by the text after the last `.` of the path.
    ///
    /// Exact, case-sensitive match; `/a.M3U8` is `Other`.
    pub fn classify(path: &str) -> Self {
        Self::from_extension(extension_of(path))
    }

    fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("m3u8") => Self::Manifest,
            Some("ts") => Self::Segment,
            _ => Self::Other,
        }
    }

    /// Whether this is a manifest or segment.
    pub fn is_media(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// `Content-Type` sent for media kinds.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Manifest => "application/vnd.apple.mpegurl",
            Self::Segment => "video/mp2t",
            Self::Other => "application/octet-stream",
        }
    }
}

fn extension_of(path: &str) -> Option<&str> {
    path.rsplit_once('.').map(|(_, ext)| ext)
}

/// A parsed incoming resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub path: String,
    pub extension: Option<String>,
}

impl ResourceRequest {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path).map(str::to_string);
        Self { path, extension }
    }

    /// Build from a raw URI path, percent-decoding it first.
    ///
    /// Traversal checks run later on the decoded form, so `%2e%2e` is
    /// treated exactly like `..`.
    pub fn from_uri_path(raw: &str) -> Result<Self> {
        let decoded = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| Error::not_found(raw))?;
        Ok(Self::new(decoded))
    }

    pub fn kind(&self) -> ResourceKind {
        ResourceKind::from_extension(self.extension.as_deref())
    }
}

/// An opened file, owned by exactly one response.
///
/// The descriptor is released when this value (or the body stream it is
/// moved into) is dropped.
#[derive(Debug)]
pub struct MediaFile {
    pub file: File,
    pub len: u64,
    pub path: PathBuf,
}

/// A directory that request paths are resolved beneath.
#[derive(Debug, Clone)]
pub struct MediaRoot {
    root: PathBuf,
}

impl MediaRoot {
    /// Canonicalize `root` once at startup.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Map a URL path to a canonical file path inside the root.
    ///
    /// Fails with [`Error::Forbidden`] for traversal attempts and
    /// [`Error::NotFound`] when nothing exists at the target.
    pub async fn resolve(&self, request_path: &str) -> Result<PathBuf> {
        let relative = sanitize(request_path)?;
        let joined = self.root.join(relative);

        let canonical = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|_| Error::not_found(request_path))?;

        if !canonical.starts_with(&self.root) {
            return Err(Error::forbidden(request_path));
        }

        Ok(canonical)
    }

    /// Resolve and open in one step. Only regular files qualify.
    pub async fn open(&self, request_path: &str) -> Result<MediaFile> {
        let path = self.resolve(request_path).await?;

        let file = File::open(&path)
            .await
            .map_err(|_| Error::not_found(request_path))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|_| Error::not_found(request_path))?;

        if !metadata.is_file() {
            return Err(Error::not_found(request_path));
        }

        Ok(MediaFile {
            file,
            len: metadata.len(),
            path,
        })
    }

    /// Report whether a request would find something to serve.
    ///
    /// `Other` requests answer `true` without touching the file system.
    /// Serving does not go through this; it calls [`MediaRoot::open`] and
    /// treats failure as absence, so there is no check/use gap.
    pub async fn exists(&self, request: &ResourceRequest) -> bool {
        if !request.kind().is_media() {
            return true;
        }
        self.open(&request.path).await.is_ok()
    }
}

/// Turn a URL path into a relative path with only normal components.
fn sanitize(request_path: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();

    for segment in request_path.split('/').filter(|s| !s.is_empty()) {
        if segment.contains('\\') || segment.contains('\0') {
            return Err(Error::forbidden(request_path));
        }

        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => relative.push(part),
            (Some(Component::CurDir), None) => {}
            _ => return Err(Error::forbidden(request_path)),
        }
    }

    Ok(relative)
}
