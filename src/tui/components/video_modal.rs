//! # Video Playback Modal
//!
//! Centered overlay shown while a video is "playing". Terminals don't decode
//! video, so playback itself is delegated to an external player (mpv by
//! default) pointed at the backend's `/video/{filename}` stream; the overlay
//! shows what is playing and owns the player process.
//!
//! Opening attempts autoplay by spawning the player; a spawn failure is
//! logged and tolerated — the overlay still opens and shows the URL so the
//! user can play it elsewhere. Closing kills the player, which is the
//! terminal equivalent of pause + reset. While open, the modal consumes all
//! input; Esc closes it.

use std::process::{Child, Command, Stdio};

use log::{debug, warn};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

/// Persistent state for the playback overlay, including the spawned player.
pub struct VideoModalState {
    pub display_name: String,
    pub formatted_size: String,
    pub url: String,
    player_command: String,
    player: Option<Child>,
}

impl VideoModalState {
    /// Open the modal and attempt autoplay.
    pub fn open(
        display_name: String,
        formatted_size: String,
        url: String,
        player_command: &str,
    ) -> Self {
        let player = match Command::new(player_command)
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!("Playing {url} via {player_command} (pid {})", child.id());
                Some(child)
            }
            Err(e) => {
                // Autoplay failure is tolerated, not surfaced as an error.
                warn!("Could not launch player '{player_command}': {e}");
                None
            }
        };

        Self {
            display_name,
            formatted_size,
            url,
            player_command: player_command.to_string(),
            player,
        }
    }

    /// Whether the external player was actually launched.
    pub fn is_playing(&self) -> bool {
        self.player.is_some()
    }

    /// Stop playback. Idempotent.
    pub fn close(&mut self) {
        if let Some(mut child) = self.player.take() {
            if let Err(e) = child.kill() {
                debug!("Player already exited: {e}");
            }
            let _ = child.wait();
        }
    }
}

impl Drop for VideoModalState {
    fn drop(&mut self) {
        // The player must not outlive the overlay (or the app).
        self.close();
    }
}

/// Transient render wrapper for the playback overlay.
pub struct VideoModal<'a> {
    state: &'a VideoModalState,
}

impl<'a> VideoModal<'a> {
    pub fn new(state: &'a VideoModalState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 8, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(format!(" ▶ {} ", self.state.display_name))
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Esc Close ").centered())
            .padding(Padding::horizontal(1));

        let label = Style::default().fg(Color::DarkGray);
        let status = if self.state.is_playing() {
            Line::styled(
                format!("Playing in {}…", self.state.player_command),
                Style::default().fg(Color::Green),
            )
        } else {
            Line::styled(
                format!(
                    "Could not launch {} — open the URL below manually",
                    self.state.player_command
                ),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            )
        };

        let body = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("File:  ", label),
                Span::raw(self.state.display_name.clone()),
            ]),
            Line::from(vec![
                Span::styled("Size:  ", label),
                Span::raw(self.state.formatted_size.clone()),
            ]),
            Line::from(vec![
                Span::styled("URL:   ", label),
                Span::raw(self.state.url.clone()),
            ]),
            Line::raw(""),
            status,
        ])
        .block(block);

        frame.render_widget(body, overlay);
    }
}

/// Compute a centered rect: percentage width, fixed height (clamped).
fn centered_rect(percent_x: u16, height: u16, outer: Rect) -> Rect {
    let height = height.min(outer.height);
    let [_, center_v, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
