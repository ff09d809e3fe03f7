//! # Backend Client
//!
//! HTTP client for the pet-behavior backend. Four endpoints:
//! `GET /health`, `POST /chat` (JSON), `POST /upload` (multipart),
//! and `GET /video/{filename}` (streamed to the external player, so the
//! client only ever builds that URL).
//!
//! Every request carries an explicit timeout so a hung backend settles as a
//! transport error instead of pinning the UI in its sending state.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};

use super::types::{ChatReply, ChatRequest, ChatResponse, ServedVideo, UploadResponse};
use crate::core::video::PendingVideo;

/// Errors from talking to the backend.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with a non-success HTTP status.
    Api { status: u16, message: String },
    /// The backend answered 200 but flagged `success: false`; carries the
    /// server's own error message, surfaced verbatim to the user.
    Backend(String),
    /// Failed to parse the backend's response body.
    Decode(String),
    /// Could not read the local file staged for upload.
    Io(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            ApiError::Backend(msg) => write!(f, "{msg}"),
            ApiError::Decode(msg) => write!(f, "malformed response: {msg}"),
            ApiError::Io(msg) => write!(f, "file error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Per-endpoint request timeouts. Uploads get a generous budget; the health
/// probe gets a tight one so a dead server is reported quickly.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub health: Duration,
    pub chat: Duration,
    pub upload: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(5),
            chat: Duration::from_secs(120),
            upload: Duration::from_secs(600),
        }
    }
}

pub struct ApiClient {
    base_url: String,
    timeouts: Timeouts,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeouts: Timeouts) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeouts,
            http: reqwest::Client::new(),
        }
    }

    /// The URL the external player streams an uploaded video from.
    pub fn video_url(&self, filename: &str) -> String {
        format!("{}/video/{}", self.base_url, filename)
    }

    /// Probe the backend. `Ok` means reachable and healthy; the caller maps
    /// the error variant onto the status indicator.
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(self.timeouts.health)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Health probe status: {status}");
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: "health check failed".to_string(),
            });
        }
        Ok(())
    }

    /// Send a text-only message and await the assistant's reply.
    pub async fn send_text(&self, message: &str) -> Result<ChatReply, ApiError> {
        info!("POST /chat ({} chars)", message.len());
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .timeout(self.timeouts.chat)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: ChatResponse = decode(response).await?;
        if !body.success {
            let message = body.error.unwrap_or_else(|| "unknown error".to_string());
            warn!("Chat request refused by backend: {message}");
            return Err(ApiError::Backend(message));
        }

        Ok(ChatReply {
            text: body.response.unwrap_or_default(),
            video: None,
        })
    }

    /// Upload a staged video plus its accompanying message as a multipart
    /// form, and await the analysis reply.
    pub async fn upload_video(
        &self,
        video: &PendingVideo,
        message: &str,
    ) -> Result<ChatReply, ApiError> {
        info!(
            "POST /upload ({}, {} bytes)",
            video.display_name, video.size_bytes
        );

        let bytes = tokio::fs::read(&video.path)
            .await
            .map_err(|e| ApiError::Io(e.to_string()))?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(video.display_name.clone())
            .mime_str(&video.mime)
            .map_err(|e| ApiError::Io(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("video", part)
            .text("message", message.to_string());

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .timeout(self.timeouts.upload)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: UploadResponse = decode(response).await?;
        if !body.success {
            let message = body.error.unwrap_or_else(|| "upload failed".to_string());
            warn!("Upload refused by backend: {message}");
            return Err(ApiError::Backend(message));
        }

        // The echoed filename keys later playback; the echoed size is what
        // the server actually stored.
        let served = body.filename.map(|filename| ServedVideo {
            filename,
            size_bytes: body.filesize.unwrap_or(0),
        });

        Ok(ChatReply {
            text: body.response.unwrap_or_default(),
            video: served,
        })
    }
}

/// Reject non-success statuses, then deserialize the JSON body.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend returned HTTP {status}: {message}");
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
