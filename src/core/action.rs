//! # Actions
//!
//! Everything that can happen in PawChat becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! Backend responds? That's `Action::ReplyReceived(reply)`.
//!
//! The `update()` function takes the current state and an action,
//! then returns the new state. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: `assert_eq!(update(state, action), expected)`.
//! And debuggable: log every action, replay the exact session.

use log::{debug, info, warn};

use crate::api::ChatReply;
use crate::core::conversation::Attachment;
use crate::core::state::{App, ConnectionStatus, SendPhase};
use crate::core::video::PendingVideo;

/// Fallback bubble text for transport-level send failures.
pub const SEND_FAILED_NOTICE: &str = "Send failed, please try again.";
/// Body substituted when a video is sent with no accompanying text.
pub const SENT_A_VIDEO: &str = "Sent a video";

const LOADING_THINKING: &str = "Thinking…";
const LOADING_UPLOADING: &str = "Uploading and analyzing video…";

#[derive(Debug)]
pub enum Action {
    /// Health probe settled.
    HealthChecked(ConnectionStatus),
    /// A file passed validation and is now staged for upload.
    VideoSelected(PendingVideo),
    /// A file was refused; carries the user-facing reason.
    VideoRejected(String),
    /// Clear the staged video.
    RemoveVideo,
    /// Send the draft text (plus the staged video, if any).
    Submit(String),
    /// The backend replied successfully.
    ReplyReceived(ChatReply),
    /// The send failed; carries the bubble text (server message verbatim for
    /// backend-signaled failures, a generic notice for transport failures).
    SendFailed(String),
    Quit,
}

/// Work the reducer asks the runtime to perform.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Spawn the network request for a just-submitted message.
    SpawnSend(SendJob),
}

/// Everything the background send task needs. The staged video is moved in
/// here at submit time — the reducer owns clearing it, the task owns using it.
#[derive(Debug, PartialEq)]
pub struct SendJob {
    pub message: String,
    pub video: Option<PendingVideo>,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::HealthChecked(status) => {
            info!("Health probe settled: {:?}", status);
            app.connection = status;
            Effect::None
        }

        Action::VideoSelected(video) => {
            debug!(
                "Staged video: {} ({} bytes, {})",
                video.display_name, video.size_bytes, video.mime
            );
            // Wholesale replacement: a new selection drops any previous one.
            app.pending_video = Some(video);
            Effect::None
        }

        Action::VideoRejected(reason) => {
            warn!("Video rejected: {reason}");
            app.conversation.push_error(&reason);
            Effect::None
        }

        Action::RemoveVideo => {
            app.pending_video = None;
            Effect::None
        }

        Action::Submit(text) => {
            // Re-entrant submits while a send is in flight are dropped, as is
            // a submit with nothing to send.
            if !app.can_send(&text) {
                debug!("Submit ignored (phase={:?})", app.phase);
                return Effect::None;
            }

            let message = text.trim().to_string();
            let video = app.pending_video.take();

            let body = if message.is_empty() {
                SENT_A_VIDEO.to_string()
            } else {
                message.clone()
            };
            let attachment = video.as_ref().map(|v| Attachment {
                display_name: v.display_name.clone(),
                size_bytes: v.size_bytes,
                server_filename: None,
            });
            let notice = if video.is_some() {
                LOADING_UPLOADING
            } else {
                LOADING_THINKING
            };

            // Optimistic render: the user's entry and the placeholder appear
            // before the request is even issued.
            app.conversation.push_user(body, attachment);
            app.conversation.begin_loading(notice);
            app.phase = SendPhase::Sending;

            Effect::SpawnSend(SendJob { message, video })
        }

        Action::ReplyReceived(reply) => {
            app.conversation.end_loading();
            let attachment = reply.video.map(|v| Attachment {
                display_name: v.filename.clone(),
                size_bytes: v.size_bytes,
                server_filename: Some(v.filename),
            });
            app.conversation.push_assistant(reply.text, attachment);
            app.phase = SendPhase::Idle;
            Effect::None
        }

        Action::SendFailed(message) => {
            warn!("Send failed: {message}");
            app.conversation.end_loading();
            app.conversation.push_error(&message);
            app.phase = SendPhase::Idle;
            Effect::None
        }

        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatReply, ServedVideo};
    use crate::core::conversation::{Entry, Role};
    use crate::test_support::{test_app, test_video};

    fn submit(app: &mut App, text: &str) -> Effect {
        update(app, Action::Submit(text.to_string()))
    }

    #[test]
    fn submit_with_no_content_is_noop() {
        let mut app = test_app();
        let effect = submit(&mut app, "   ");
        assert_eq!(effect, Effect::None);
        assert!(app.conversation.is_empty());
        assert_eq!(app.phase, SendPhase::Idle);
    }

    #[test]
    fn submit_renders_user_entry_and_placeholder() {
        let mut app = test_app();
        let effect = submit(&mut app, "why does my dog spin?");

        assert!(matches!(effect, Effect::SpawnSend(_)));
        assert_eq!(app.phase, SendPhase::Sending);
        assert_eq!(app.conversation.entries.len(), 2);

        let user = app.conversation.entries[0].as_message().unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.body, "why does my dog spin?");
        assert!(matches!(
            app.conversation.entries[1],
            Entry::Loading { .. }
        ));
    }

    #[test]
    fn second_submit_while_sending_is_dropped() {
        let mut app = test_app();
        let first = submit(&mut app, "hello");
        assert!(matches!(first, Effect::SpawnSend(_)));

        let second = submit(&mut app, "hello again");
        assert_eq!(second, Effect::None);
        // Still just the one user entry and one placeholder.
        assert_eq!(app.conversation.entries.len(), 2);
    }

    #[test]
    fn submit_with_video_moves_it_into_the_job() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));

        let effect = submit(&mut app, "look at this");
        let Effect::SpawnSend(job) = effect else {
            panic!("expected SpawnSend");
        };
        assert!(job.video.is_some());
        assert!(app.pending_video.is_none(), "staged video moved into job");

        let user = app.conversation.entries[0].as_message().unwrap();
        let attachment = user.attachment.as_ref().unwrap();
        assert_eq!(attachment.display_name, "clip.mp4");
        assert!(attachment.server_filename.is_none());
    }

    #[test]
    fn video_only_submit_gets_default_body() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));

        submit(&mut app, "");
        let user = app.conversation.entries[0].as_message().unwrap();
        assert_eq!(user.body, SENT_A_VIDEO);
    }

    #[test]
    fn upload_uses_distinct_loading_notice() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));
        submit(&mut app, "analyze");

        let Entry::Loading { notice } = &app.conversation.entries[1] else {
            panic!("expected loading placeholder");
        };
        assert_eq!(notice, LOADING_UPLOADING);
    }

    #[test]
    fn reply_replaces_placeholder_and_returns_to_idle() {
        let mut app = test_app();
        submit(&mut app, "hello");

        update(
            &mut app,
            Action::ReplyReceived(ChatReply {
                text: "Hi! How can I help with your pet?".to_string(),
                video: None,
            }),
        );

        assert_eq!(app.phase, SendPhase::Idle);
        assert_eq!(app.conversation.entries.len(), 2);
        let reply = app.conversation.entries[1].as_message().unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.body, "Hi! How can I help with your pet?");
        assert!(
            !app.conversation
                .entries
                .iter()
                .any(|e| matches!(e, Entry::Loading { .. })),
            "no residual loading entry"
        );
    }

    #[test]
    fn upload_reply_echoes_server_attachment() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));
        submit(&mut app, "analyze");

        update(
            &mut app,
            Action::ReplyReceived(ChatReply {
                text: "Your cat is stalking.".to_string(),
                video: Some(ServedVideo {
                    filename: "20260806_clip.mp4".to_string(),
                    size_bytes: 4096,
                }),
            }),
        );

        let reply = app.conversation.entries[1].as_message().unwrap();
        let attachment = reply.attachment.as_ref().unwrap();
        assert_eq!(
            attachment.server_filename.as_deref(),
            Some("20260806_clip.mp4")
        );
        assert_eq!(attachment.size_bytes, 4096);
    }

    #[test]
    fn failure_leaves_error_bubble_and_clears_state() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));
        submit(&mut app, "hello");

        update(&mut app, Action::SendFailed(SEND_FAILED_NOTICE.to_string()));

        assert_eq!(app.phase, SendPhase::Idle);
        assert!(app.pending_video.is_none());
        // User entry survives; placeholder gone; one error bubble.
        assert_eq!(app.conversation.entries.len(), 2);
        let bubble = app.conversation.entries[1].as_message().unwrap();
        assert_eq!(bubble.role, Role::Assistant);
        assert!(bubble.body.contains(SEND_FAILED_NOTICE));
        // Typing new content re-enables sending.
        assert!(app.can_send("retry"));
    }

    #[test]
    fn backend_error_message_is_surfaced_verbatim() {
        let mut app = test_app();
        submit(&mut app, "hello");
        update(
            &mut app,
            Action::SendFailed("video too blurry to analyze".to_string()),
        );
        let bubble = app.conversation.entries[1].as_message().unwrap();
        assert!(bubble.body.contains("video too blurry to analyze"));
    }

    #[test]
    fn rejected_video_leaves_selection_unchanged() {
        let mut app = test_app();
        update(
            &mut app,
            Action::VideoRejected("Please choose a video file (got image/png)".to_string()),
        );
        assert!(app.pending_video.is_none());
        let bubble = app.conversation.entries[0].as_message().unwrap();
        assert_eq!(bubble.role, Role::Assistant);
        assert!(bubble.body.contains("image/png"));
    }

    #[test]
    fn new_selection_replaces_previous() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));
        let mut other = test_video();
        other.display_name = "zoomies.webm".to_string();
        update(&mut app, Action::VideoSelected(other));

        assert_eq!(
            app.pending_video.as_ref().unwrap().display_name,
            "zoomies.webm"
        );
    }

    #[test]
    fn remove_video_clears_selection() {
        let mut app = test_app();
        update(&mut app, Action::VideoSelected(test_video()));
        update(&mut app, Action::RemoveVideo);
        assert!(app.pending_video.is_none());
    }

    #[test]
    fn health_outcome_never_touches_conversation_or_phase() {
        let mut app = test_app();
        update(&mut app, Action::HealthChecked(ConnectionStatus::Offline));
        assert_eq!(app.connection, ConnectionStatus::Offline);
        assert!(app.conversation.is_empty());
        assert_eq!(app.phase, SendPhase::Idle);
        assert!(app.can_send("still works"));
    }

    #[test]
    fn quit_produces_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
