use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub video: VideoConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Document served at `/`
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,

    /// Directory for non-media assets (anything that is not `.m3u8` or `.ts`).
    /// Unset means such paths answer 404.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_index_file() -> PathBuf {
    PathBuf::from("index.html")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            index_file: default_index_file(),
            static_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Base directory; the request path is joined underneath it, so
    /// `/videos/ayc.m3u8` maps to `<root>/videos/ayc.m3u8`.
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

fn default_media_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

/// The single video advertised by `/api/get_video`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoConfig {
    #[serde(default = "default_video_url")]
    pub url: String,

    #[serde(default = "default_sample_url")]
    pub sample_url: String,

    /// Total playback length in seconds
    #[serde(default = "default_total_length")]
    pub total_length: f64,
}

fn default_video_url() -> String {
    "/videos/ayc.m3u8".to_string()
}
fn default_sample_url() -> String {
    "/videos/ayc-sample.m3u8".to_string()
}
fn default_total_length() -> f64 {
    58.0
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            url: default_video_url(),
            sample_url: default_sample_url(),
            total_length: default_total_length(),
        }
    }
}
