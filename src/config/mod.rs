mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./ratsnake.toml",
        "~/.config/ratsnake/config.toml",
        "/etc/ratsnake/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if !config.media.root.is_dir() {
        tracing::warn!("Media root does not exist: {:?}", config.media.root);
    }

    if !config.server.index_file.is_file() {
        tracing::warn!("Index file does not exist: {:?}", config.server.index_file);
    }

    if let Some(dir) = &config.server.static_dir {
        if !dir.is_dir() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    let video = &config.video;
    if video.url.is_empty() || video.sample_url.is_empty() {
        anyhow::bail!("Video url and sample_url must not be empty");
    }
    if !video.total_length.is_finite() || video.total_length < 0.0 {
        anyhow::bail!(
            "Video total_length must be a non-negative number, got {}",
            video.total_length
        );
    }

    Ok(())
}
