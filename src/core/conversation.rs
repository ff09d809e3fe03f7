//! # Conversation Log
//!
//! The append-only message log rendered by the TUI. Entries are never
//! mutated after insertion; the loading placeholder is the one exception
//! (pushed when a send starts, removed before the reply lands).
//!
//! `revision` counts mutations so the renderer can invalidate its layout
//! cache without diffing entries.

use serde::{Deserialize, Serialize};

/// Who authored a message entry.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

/// Video metadata attached to a message entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Name shown in the thumbnail and the player modal.
    pub display_name: String,
    pub size_bytes: u64,
    /// Filename assigned by the server on upload; used to build the
    /// playback URL. `None` for the optimistic user-side entry.
    pub server_filename: Option<String>,
}

impl Attachment {
    /// The filename used for playback — the server-assigned name when the
    /// backend echoed one, the local display name otherwise.
    pub fn playback_filename(&self) -> &str {
        self.server_filename.as_deref().unwrap_or(&self.display_name)
    }
}

/// A finished message entry in the log.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageEntry {
    pub role: Role,
    pub body: String,
    pub attachment: Option<Attachment>,
    /// Local wall-clock time of insertion, "HH:MM".
    pub timestamp: String,
}

/// One item in the conversation — a finished message or the transient
/// loading placeholder shown while a reply is pending.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Entry {
    Message(MessageEntry),
    Loading { notice: String },
}

impl Entry {
    pub fn as_message(&self) -> Option<&MessageEntry> {
        match self {
            Entry::Message(m) => Some(m),
            Entry::Loading { .. } => None,
        }
    }
}

/// The ordered message log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub entries: Vec<Entry>,
    /// Bumped on every mutation; consumed by the layout cache.
    pub revision: u64,
}

fn local_clock() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
        self.revision += 1;
    }

    pub fn push_user(&mut self, body: String, attachment: Option<Attachment>) {
        self.push(Entry::Message(MessageEntry {
            role: Role::User,
            body,
            attachment,
            timestamp: local_clock(),
        }));
    }

    pub fn push_assistant(&mut self, body: String, attachment: Option<Attachment>) {
        self.push(Entry::Message(MessageEntry {
            role: Role::Assistant,
            body,
            attachment,
            timestamp: local_clock(),
        }));
    }

    /// Error bubbles are assistant-authored, prefixed so they read as
    /// failures rather than answers.
    pub fn push_error(&mut self, message: &str) {
        self.push_assistant(format!("✗ {message}"), None);
    }

    /// Insert the loading placeholder at the end of the log.
    pub fn begin_loading(&mut self, notice: &str) {
        self.push(Entry::Loading {
            notice: notice.to_string(),
        });
    }

    /// Remove the loading placeholder if present. Safe to call when no
    /// placeholder exists (e.g. a late failure after it was already removed).
    pub fn end_loading(&mut self) {
        let before = self.entries.len();
        self.entries.retain(|e| !matches!(e, Entry::Loading { .. }));
        if self.entries.len() != before {
            self.revision += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Format a byte count as the largest unit in {Bytes, KB, MB, GB} with a
/// value ≥ 1, rounded to two decimals with trailing zeros trimmed.
/// Mirrors what the backend reports for uploads, so both sides agree.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    // Largest tier where the value stays ≥ 1, capped at GB.
    let mut tier = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && tier < UNITS.len() - 1 {
        scaled /= 1024;
        tier += 1;
    }
    let value = (bytes as f64 / 1024f64.powi(tier as i32) * 100.0).round() / 100.0;
    // f64 Display drops the trailing ".0"/".50", matching "1 MB" and "1.5 KB"
    format!("{} {}", value, UNITS[tier])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Macro to generate size-formatting test cases.
    /// $name:ident names the test, $bytes:expr is the input count,
    /// $expected:expr the formatted string.
    macro_rules! test_format_size {
        ( $($name:ident: $bytes:expr => $expected:expr,)+ ) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(format_size($bytes), $expected);
                }
            )+
        };
    }

    test_format_size! {
        format_size_zero: 0 => "0 Bytes",
        format_size_one_byte: 1 => "1 Bytes",
        format_size_below_one_kb: 1023 => "1023 Bytes",
        format_size_exactly_one_kb: 1024 => "1 KB",
        format_size_one_and_a_half_kb: 1536 => "1.5 KB",
        format_size_exactly_one_mb: 1_048_576 => "1 MB",
        format_size_two_decimals: 1_500_000 => "1.43 MB",
        format_size_upload_ceiling: 104_857_600 => "100 MB",
        format_size_one_gb: 1_073_741_824 => "1 GB",
        format_size_caps_at_gb: 2_199_023_255_552 => "2048 GB",
    }

    #[test]
    fn push_user_appends_in_order() {
        let mut log = Conversation::new();
        log.push_user("hello".to_string(), None);
        log.push_assistant("hi there".to_string(), None);

        assert_eq!(log.entries.len(), 2);
        let first = log.entries[0].as_message().unwrap();
        assert_eq!(first.role, Role::User);
        assert_eq!(first.body, "hello");
        let second = log.entries[1].as_message().unwrap();
        assert_eq!(second.role, Role::Assistant);
    }

    #[test]
    fn end_loading_removes_only_the_placeholder() {
        let mut log = Conversation::new();
        log.push_user("analyze this".to_string(), None);
        log.begin_loading("Thinking…");
        assert_eq!(log.entries.len(), 2);

        log.end_loading();
        assert_eq!(log.entries.len(), 1);
        assert!(log.entries[0].as_message().is_some());
    }

    #[test]
    fn end_loading_without_placeholder_is_noop() {
        let mut log = Conversation::new();
        log.push_user("hi".to_string(), None);
        let revision = log.revision;
        log.end_loading();
        assert_eq!(log.entries.len(), 1);
        assert_eq!(log.revision, revision);
    }

    #[test]
    fn revision_tracks_mutations() {
        let mut log = Conversation::new();
        assert_eq!(log.revision, 0);
        log.push_user("a".to_string(), None);
        log.begin_loading("…");
        log.end_loading();
        assert_eq!(log.revision, 3);
    }

    #[test]
    fn error_bubble_is_assistant_authored() {
        let mut log = Conversation::new();
        log.push_error("Send failed, please try again.");
        let entry = log.entries[0].as_message().unwrap();
        assert_eq!(entry.role, Role::Assistant);
        assert!(entry.body.contains("Send failed"));
        assert!(entry.body.starts_with('✗'));
    }

    #[test]
    fn playback_filename_prefers_server_name() {
        let att = Attachment {
            display_name: "walk.mp4".to_string(),
            size_bytes: 1024,
            server_filename: Some("20260806_walk.mp4".to_string()),
        };
        assert_eq!(att.playback_filename(), "20260806_walk.mp4");

        let local_only = Attachment {
            display_name: "walk.mp4".to_string(),
            size_bytes: 1024,
            server_filename: None,
        };
        assert_eq!(local_only.playback_filename(), "walk.mp4");
    }
}
