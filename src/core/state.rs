//! # Application State
//!
//! Core business state for PawChat. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── api: Arc<ApiClient>              // backend HTTP client
//! ├── conversation: Conversation       // append-only message log
//! ├── pending_video: Option<..>        // at most one staged upload
//! ├── phase: SendPhase                 // Idle | Sending
//! ├── connection: ConnectionStatus     // health probe outcome
//! └── status_message: String           // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::core::conversation::Conversation;
use crate::core::video::PendingVideo;

/// Whether a send is in flight. An explicit enum rather than a boolean so the
/// guard in the reducer reads as the state machine it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendPhase {
    #[default]
    Idle,
    Sending,
}

/// Outcome of the startup health probe. Informational only — sending is
/// never gated on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Probe still in flight.
    #[default]
    Checking,
    Connected,
    /// Server reachable but answered with a non-success status.
    Degraded,
    /// Transport failure — server unreachable.
    Offline,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Checking => "Checking…",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Degraded => "Server error",
            ConnectionStatus::Offline => "Server offline",
        }
    }
}

pub struct App {
    pub api: Arc<ApiClient>,
    pub conversation: Conversation,
    pub pending_video: Option<PendingVideo>,
    pub phase: SendPhase,
    pub connection: ConnectionStatus,
    pub status_message: String,
}

impl App {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            conversation: Conversation::new(),
            pending_video: None,
            phase: SendPhase::default(),
            connection: ConnectionStatus::default(),
            status_message: String::from("Welcome to PawChat!"),
        }
    }

    /// Whether a send may be initiated right now with the given draft text.
    /// Requires content (trimmed text or a staged video) and an idle phase.
    pub fn can_send(&self, draft: &str) -> bool {
        self.phase == SendPhase::Idle
            && (!draft.trim().is_empty() || self.pending_video.is_some())
    }
}
