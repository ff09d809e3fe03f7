//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//! Network calls run on tokio tasks that report back over an mpsc channel
//! as Actions, drained once per loop iteration.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (reply pending): draws every ~80ms for a smooth spinner.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous
//! redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ApiClient, ApiError};
use crate::core::action::{Action, Effect, SEND_FAILED_NOTICE, SendJob, update};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::{Entry, format_size};
use crate::core::state::{App, ConnectionStatus, SendPhase};
use crate::core::video::PendingVideo;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    AttachEvent, AttachPromptState, InputBox, InputEvent, MessageListState, VideoModalState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Modal input mode: determines how keyboard events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigate entries with arrow keys; Enter plays a selected video.
    /// Typing auto-switches to Input.
    Cursor,
    /// Text editing in the input box. Esc switches to Cursor.
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub input_box: InputBox,
    // Modal input mode
    pub input_mode: InputMode,
    // Overlays (None = hidden)
    pub attach_prompt: Option<AttachPromptState>,
    pub video_modal: Option<VideoModalState>,
    // External player command for the video modal
    pub player_command: String,
}

impl TuiState {
    pub fn new(player_command: String) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            input_mode: InputMode::Input, // User expects to type immediately
            attach_prompt: None,
            video_modal: None,
            player_command,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter
        // detection); terminals that don't support it ignore it harmlessly.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let api = Arc::new(ApiClient::new(&config.base_url, config.timeouts));
    let mut app = App::new(api.clone());
    let mut tui = TuiState::new(config.player_command.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Health probe runs once at startup; it only drives the indicator.
    spawn_health_check(api.clone(), tx.clone());

    // Animation timer
    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = app.phase == SendPhase::Sending;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Resize just needs a redraw (already flagged above)
            if matches!(event, TuiEvent::Resize) {
                continue;
            }

            // ForceQuit (Ctrl+C) always quits regardless of mode
            if matches!(event, TuiEvent::ForceQuit) {
                if update(&mut app, Action::Quit) == Effect::Quit {
                    should_quit = true;
                }
                continue;
            }

            // When the playback modal is open it consumes all input;
            // Esc closes it (pause + reset + hide).
            if let Some(ref mut modal) = tui.video_modal {
                if matches!(event, TuiEvent::Escape) {
                    modal.close();
                    tui.video_modal = None;
                }
                continue;
            }

            // When the attach prompt is open, route all events to it
            if let Some(ref mut prompt) = tui.attach_prompt {
                match prompt.handle_event(&event) {
                    Some(AttachEvent::Confirm(path)) => {
                        // Validation happens here, at the adapter edge; the
                        // reducer only sees the verdict.
                        let action = match PendingVideo::from_path(&path) {
                            Ok(video) => Action::VideoSelected(video),
                            Err(e) => Action::VideoRejected(e.to_string()),
                        };
                        update(&mut app, action);
                        tui.attach_prompt = None;
                    }
                    Some(AttachEvent::Dismiss) => {
                        tui.attach_prompt = None;
                    }
                    None => {}
                }
                continue;
            }

            // Ctrl+U opens the attach prompt
            if matches!(event, TuiEvent::OpenAttach) {
                tui.attach_prompt = Some(AttachPromptState::new());
                continue;
            }

            // Ctrl+X drops the staged video
            if matches!(event, TuiEvent::RemoveAttachment) {
                update(&mut app, Action::RemoveVideo);
                continue;
            }

            // Mouse hover — always active regardless of mode
            if let TuiEvent::MouseMove(_col, row) = event {
                let frame_area = terminal.get_frame().area();
                let scroll_offset = tui.message_list.scroll_state.offset().y;
                let input_height = tui.input_box.calculate_height(frame_area.width);

                tui.message_list.selected_index = ui::hit_test_entry(
                    row,
                    frame_area,
                    scroll_offset,
                    &tui.message_list.layout.prefix_heights,
                    app.pending_video.is_some(),
                    input_height,
                );
                continue;
            }

            // Mouse click — activate a video thumbnail
            if let TuiEvent::MouseClick(_col, row) = event {
                let frame_area = terminal.get_frame().area();
                let scroll_offset = tui.message_list.scroll_state.offset().y;
                let input_height = tui.input_box.calculate_height(frame_area.width);

                let hit = ui::hit_test_entry(
                    row,
                    frame_area,
                    scroll_offset,
                    &tui.message_list.layout.prefix_heights,
                    app.pending_video.is_some(),
                    input_height,
                );

                if let Some(idx) = hit {
                    tui.message_list.selected_index = Some(idx);
                    open_player_for_entry(&app, &mut tui, idx);
                }
                continue;
            }

            // Scroll events — always go to MessageList regardless of mode
            if matches!(
                event,
                TuiEvent::ScrollUp
                    | TuiEvent::ScrollDown
                    | TuiEvent::ScrollPageUp
                    | TuiEvent::ScrollPageDown
            ) {
                tui.message_list.handle_event(&event);
                continue;
            }

            // Modal event dispatch
            match tui.input_mode {
                InputMode::Input => {
                    // Esc → switch to Cursor mode, selecting the last entry
                    if matches!(event, TuiEvent::Escape) {
                        tui.input_mode = InputMode::Cursor;
                        let len = app.conversation.entries.len();
                        tui.message_list.selected_index =
                            if len > 0 { Some(len - 1) } else { None };
                        continue;
                    }
                    // Up/Down scroll the conversation while typing
                    if matches!(event, TuiEvent::CursorUp) {
                        tui.message_list.handle_event(&TuiEvent::ScrollUp);
                        continue;
                    }
                    if matches!(event, TuiEvent::CursorDown) {
                        tui.message_list.handle_event(&TuiEvent::ScrollDown);
                        continue;
                    }

                    // InputBox handles everything else
                    if let Some(input_event) = tui.input_box.handle_event(&event) {
                        match input_event {
                            InputEvent::SubmitRequested => {
                                // The guard runs against the untouched draft;
                                // a blocked submit keeps it intact.
                                if app.can_send(tui.input_box.text()) {
                                    let text = tui.input_box.take_text();
                                    let effect = update(&mut app, Action::Submit(text));
                                    handle_effect(effect, &api, &tx, &mut should_quit);
                                }
                            }
                            InputEvent::ContentChanged => {}
                        }
                    }
                }
                InputMode::Cursor => {
                    match event {
                        // Esc in Cursor mode is a no-op
                        TuiEvent::Escape => {}
                        // Enter plays the selected entry's video, if any;
                        // otherwise drops back into the input box
                        TuiEvent::Submit => {
                            let played = match tui.message_list.selected_index {
                                Some(idx) => open_player_for_entry(&app, &mut tui, idx),
                                None => false,
                            };
                            if !played {
                                tui.input_mode = InputMode::Input;
                                tui.message_list.selected_index = None;
                            }
                        }
                        // Typing auto-switches to Input mode and forwards the event
                        TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                            tui.input_mode = InputMode::Input;
                            tui.message_list.selected_index = None;
                            tui.input_box.handle_event(&event);
                        }
                        // Up/Down navigate entries
                        TuiEvent::CursorUp => {
                            let len = app.conversation.entries.len();
                            if len > 0 {
                                let idx = tui
                                    .message_list
                                    .selected_index
                                    .map(|i| i.saturating_sub(1))
                                    .unwrap_or(len - 1);
                                tui.message_list.selected_index = Some(idx);
                                tui.message_list.scroll_to_selected();
                            }
                        }
                        TuiEvent::CursorDown => {
                            let len = app.conversation.entries.len();
                            if let Some(idx) = tui.message_list.selected_index
                                && idx + 1 < len
                            {
                                tui.message_list.selected_index = Some(idx + 1);
                                tui.message_list.scroll_to_selected();
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if should_quit {
            break 'main;
        }

        // Handle background task actions (health probe, send results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            handle_effect(effect, &api, &tx, &mut should_quit);
        }

        if should_quit {
            break 'main;
        }
    }

    // Make sure a spawned player doesn't outlive the app
    if let Some(ref mut modal) = tui.video_modal {
        modal.close();
    }

    ratatui::restore();
    Ok(())
}

fn handle_effect(
    effect: Effect,
    api: &Arc<ApiClient>,
    tx: &mpsc::Sender<Action>,
    should_quit: &mut bool,
) {
    match effect {
        Effect::Quit => *should_quit = true,
        Effect::SpawnSend(job) => spawn_send(api.clone(), job, tx.clone()),
        Effect::None => {}
    }
}

/// Open the playback modal for the entry at `idx`, if it carries a video.
/// Returns whether a modal was opened.
fn open_player_for_entry(app: &App, tui: &mut TuiState, idx: usize) -> bool {
    let Some(Entry::Message(msg)) = app.conversation.entries.get(idx) else {
        return false;
    };
    let Some(attachment) = &msg.attachment else {
        return false;
    };

    let url = app.api.video_url(attachment.playback_filename());
    info!("Opening playback modal for {}", attachment.display_name);
    tui.video_modal = Some(VideoModalState::open(
        attachment.display_name.clone(),
        format_size(attachment.size_bytes),
        url,
        &tui.player_command,
    ));
    true
}

/// Probe the backend once and report the verdict for the status indicator.
fn spawn_health_check(api: Arc<ApiClient>, tx: mpsc::Sender<Action>) {
    tokio::spawn(async move {
        let status = match api.health().await {
            Ok(()) => ConnectionStatus::Connected,
            Err(ApiError::Api { status, .. }) => {
                warn!("Health probe: server answered HTTP {status}");
                ConnectionStatus::Degraded
            }
            Err(e) => {
                warn!("Health probe: {e}");
                ConnectionStatus::Offline
            }
        };
        if tx.send(Action::HealthChecked(status)).is_err() {
            warn!("Failed to deliver health result: receiver dropped");
        }
    });
}

/// Issue the network request for a submitted message on a background task.
/// Exactly one of these runs at a time — the reducer's phase guard drops
/// re-entrant submits.
fn spawn_send(api: Arc<ApiClient>, job: SendJob, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning send (video: {})",
        job.video.as_ref().map_or("none", |v| &v.display_name)
    );
    tokio::spawn(async move {
        let result = match &job.video {
            Some(video) => api.upload_video(video, &job.message).await,
            None => api.send_text(&job.message).await,
        };

        let action = match result {
            Ok(reply) => Action::ReplyReceived(reply),
            // Backend-signaled failures surface the server's message
            // verbatim; everything else gets the generic retry notice.
            Err(ApiError::Backend(message)) => Action::SendFailed(message),
            Err(e) => {
                warn!("Send failed: {e}");
                Action::SendFailed(SEND_FAILED_NOTICE.to_string())
            }
        };

        if tx.send(action).is_err() {
            warn!("Failed to deliver send result: receiver dropped");
        }
    });
}
