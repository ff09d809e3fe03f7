//! # Attach Prompt Component
//!
//! Centered overlay for staging a video: the user types a filesystem path and
//! confirms with Enter. Opened with Ctrl+U, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `AttachPromptState` lives in `TuiState`
//! - `AttachPrompt` is created each frame with borrowed state
//!
//! Validation (MIME, size ceiling) happens in the event loop once the path is
//! confirmed; this overlay only collects it.

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::tui::event::TuiEvent;

/// Persistent state for the attach overlay.
#[derive(Default)]
pub struct AttachPromptState {
    pub path: String,
}

/// Events emitted by the attach prompt.
pub enum AttachEvent {
    /// User confirmed a non-empty path.
    Confirm(PathBuf),
    Dismiss,
}

impl AttachPromptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key event, returning an AttachEvent if the overlay should act.
    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<AttachEvent> {
        match event {
            TuiEvent::Escape => Some(AttachEvent::Dismiss),
            TuiEvent::Submit => {
                let trimmed = self.path.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(AttachEvent::Confirm(PathBuf::from(trimmed)))
                }
            }
            TuiEvent::InputChar(c) if *c != '\n' => {
                self.path.push(*c);
                None
            }
            TuiEvent::Paste(text) => {
                self.path.push_str(text);
                None
            }
            TuiEvent::Backspace => {
                self.path.pop();
                None
            }
            _ => None,
        }
    }
}

/// Transient render wrapper for the attach overlay.
pub struct AttachPrompt<'a> {
    state: &'a AttachPromptState,
}

impl<'a> AttachPrompt<'a> {
    pub fn new(state: &'a AttachPromptState) -> Self {
        Self { state }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 5, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Attach video ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Attach  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));

        let input_line = Line::from(format!("{}▏", self.state.path));
        let hint = Line::styled(
            "Path to a video file (≤ 100 MB)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );

        let body = Paragraph::new(vec![input_line, hint]).block(block);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_builds_the_path() {
        let mut state = AttachPromptState::new();
        for c in "/tmp/a.mp4".chars() {
            state.handle_event(&TuiEvent::InputChar(c));
        }
        assert_eq!(state.path, "/tmp/a.mp4");

        state.handle_event(&TuiEvent::Backspace);
        assert_eq!(state.path, "/tmp/a.mp");
    }

    #[test]
    fn submit_empty_path_is_ignored() {
        let mut state = AttachPromptState::new();
        assert!(state.handle_event(&TuiEvent::Submit).is_none());
        state.handle_event(&TuiEvent::InputChar(' '));
        assert!(state.handle_event(&TuiEvent::Submit).is_none());
    }

    #[test]
    fn submit_confirms_trimmed_path() {
        let mut state = AttachPromptState::new();
        state.handle_event(&TuiEvent::Paste(" /videos/walk.mp4 ".to_string()));
        match state.handle_event(&TuiEvent::Submit) {
            Some(AttachEvent::Confirm(path)) => {
                assert_eq!(path, PathBuf::from("/videos/walk.mp4"));
            }
            _ => panic!("expected Confirm"),
        }
    }

    #[test]
    fn escape_dismisses() {
        let mut state = AttachPromptState::new();
        assert!(matches!(
            state.handle_event(&TuiEvent::Escape),
            Some(AttachEvent::Dismiss)
        ));
    }

    #[test]
    fn render_shows_title_and_hint() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = AttachPromptState::new();
        state.handle_event(&TuiEvent::Paste("/tmp/clip.mp4".to_string()));

        terminal
            .draw(|f| {
                AttachPrompt::new(&state).render(f, f.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text = buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Attach video"));
        assert!(text.contains("/tmp/clip.mp4"));
        assert!(text.contains("100 MB"));
    }
}
