//! # TUI Components
//!
//! Components follow two patterns:
//!
//! **Stateless (props-based)**: receive all data as struct fields and just
//! render — `TitleBar`, `MessageView`, `FilePreview`.
//!
//! **Stateful (event-driven)**: persistent state lives in `TuiState`, a
//! transient wrapper borrows it each frame — `InputBox`, `MessageList`, and
//! the two overlays (`AttachPrompt`, `VideoModal`).
//!
//! Each component file is self-contained: state types, event types,
//! rendering, event handling, and tests live together.

pub mod attach_prompt;
pub mod file_preview;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod title_bar;
pub mod video_modal;

pub use attach_prompt::{AttachEvent, AttachPrompt, AttachPromptState};
pub use file_preview::FilePreview;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
pub use video_modal::{VideoModal, VideoModalState};
