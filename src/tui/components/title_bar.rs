//! # TitleBar Component
//!
//! Top status bar: application name, backend connection indicator, and the
//! transient status message. Purely presentational — all data arrives as
//! props, making it trivial to test against a `TestBackend`.
//!
//! The connection indicator is the only place health-probe results surface;
//! sending is never gated on it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::ConnectionStatus;
use crate::tui::component::Component;

pub struct TitleBar {
    pub connection: ConnectionStatus,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(connection: ConnectionStatus, status_message: String) -> Self {
        Self {
            connection,
            status_message,
        }
    }

    fn indicator(&self) -> Span<'static> {
        let (glyph, color) = match self.connection {
            ConnectionStatus::Checking => ("◌", Color::DarkGray),
            ConnectionStatus::Connected => ("●", Color::Green),
            ConnectionStatus::Degraded => ("●", Color::Yellow),
            ConnectionStatus::Offline => ("●", Color::Red),
        };
        Span::styled(
            format!("{glyph} {}", self.connection.label()),
            Style::default().fg(color),
        )
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("PawChat", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            self.indicator(),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(self.status_message.clone()));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_to_text(mut bar: TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_connected_indicator() {
        let text = render_to_text(TitleBar::new(ConnectionStatus::Connected, String::new()));
        assert!(text.contains("PawChat"));
        assert!(text.contains("Connected"));
        assert!(!text.contains("offline"));
    }

    #[test]
    fn distinguishes_degraded_from_offline() {
        let degraded = render_to_text(TitleBar::new(ConnectionStatus::Degraded, String::new()));
        assert!(degraded.contains("Server error"));

        let offline = render_to_text(TitleBar::new(ConnectionStatus::Offline, String::new()));
        assert!(offline.contains("Server offline"));
    }

    #[test]
    fn appends_status_message_when_present() {
        let text = render_to_text(TitleBar::new(
            ConnectionStatus::Connected,
            "Welcome to PawChat!".to_string(),
        ));
        assert!(text.contains("Welcome to PawChat!"));
    }
}
