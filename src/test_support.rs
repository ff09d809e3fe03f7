//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{ApiClient, Timeouts};
use crate::core::state::App;
use crate::core::video::PendingVideo;

/// Creates a test App whose client points at a dead address. Reducer tests
/// never issue requests, so the address is irrelevant.
pub fn test_app() -> App {
    App::new(Arc::new(ApiClient::new(
        "http://127.0.0.1:1/api",
        Timeouts::default(),
    )))
}

/// A staged video that skips filesystem inspection.
pub fn test_video() -> PendingVideo {
    PendingVideo {
        path: PathBuf::from("/videos/clip.mp4"),
        display_name: "clip.mp4".to_string(),
        size_bytes: 2048,
        mime: "video/mp4".to_string(),
    }
}
