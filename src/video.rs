//! Playback metadata for the advertised video.

use serde::{Serialize, Serializer};

use crate::config::VideoConfig;

/// Response body of `GET /api/get_video`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Path to the full-quality manifest.
    pub url: String,
    /// Path to the preview manifest.
    pub sample_url: String,
    /// Duration in seconds.
    #[serde(serialize_with = "serialize_seconds")]
    pub total_length: f64,
}

impl From<&VideoConfig> for VideoMetadata {
    fn from(config: &VideoConfig) -> Self {
        Self {
            url: config.url.clone(),
            sample_url: config.sample_url.clone(),
            total_length: config.total_length,
        }
    }
}

/// Whole seconds go out as a JSON integer (`58`, not `58.0`).
fn serialize_seconds<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let whole = value.trunc();
    if value.is_finite() && whole == *value && whole.abs() < i64::MAX as f64 {
        serializer.serialize_i64(whole as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
