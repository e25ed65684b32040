//! Ratsnake - HLS media gateway
//!
//! Serves one video's playback metadata plus the HLS manifests and
//! segments it points at. The library crate exposes the router for
//! integration testing.

pub mod config;
pub mod error;
pub mod server;
pub mod streaming;
pub mod video;

pub use error::{Error, Result};
