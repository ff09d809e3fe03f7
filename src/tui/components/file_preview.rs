//! # FilePreview Component
//!
//! One-line strip above the input box showing the staged video: name,
//! human-readable size, and the key that removes it. Rendered only while a
//! video is staged; the parent collapses the row otherwise.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::conversation::format_size;
use crate::core::video::PendingVideo;
use crate::tui::component::Component;

pub struct FilePreview<'a> {
    pub video: &'a PendingVideo,
}

impl<'a> FilePreview<'a> {
    pub fn new(video: &'a PendingVideo) -> Self {
        Self { video }
    }
}

impl<'a> Component for FilePreview<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "🎥 ",
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                self.video.display_name.clone(),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", format_size(self.video.size_bytes)),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(
                "  (Ctrl+X to remove)",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(line, area);
    }
}
