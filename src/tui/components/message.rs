use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};

use crate::core::conversation::{Entry, MessageEntry, Role, format_size};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Spinner frames for the loading placeholder.
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A stateless component that renders a single conversation entry.
///
/// `MessageView` is a transient component: created fresh each frame with the
/// data it needs to render. Selection state is passed in from the parent
/// `MessageList`, which tracks it persistently.
///
/// A video attachment renders as an activatable block inside the entry —
/// icon, display name, formatted size, and the call-to-action that opens the
/// playback modal. Height is predicted with `textwrap` so the parent can lay
/// out the scroll view without rendering first; the same pre-wrapped lines
/// are then handed to `Paragraph`, keeping prediction and rendering in
/// lockstep.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub entry: &'a Entry,
    /// Whether this entry is selected (hover or keyboard navigation).
    pub is_selected: bool,
    /// Animation frame for the loading placeholder spinner.
    pub spinner_frame: usize,
}

fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "assistant",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

/// The two text lines an attachment contributes, pre-formatted.
fn attachment_lines(entry: &MessageEntry) -> Option<(String, String)> {
    entry.attachment.as_ref().map(|att| {
        (
            format!("▶ {}", att.display_name),
            format!("{} • Enter to play", format_size(att.size_bytes)),
        )
    })
}

impl<'a> MessageView<'a> {
    pub fn new(entry: &'a Entry, is_selected: bool, spinner_frame: usize) -> Self {
        Self {
            entry,
            is_selected,
            spinner_frame,
        }
    }

    /// Calculate the height required for this entry at the given width,
    /// including borders. Must agree exactly with `render`.
    pub fn calculate_height(entry: &Entry, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        match entry {
            Entry::Loading { .. } => 1 + VERTICAL_OVERHEAD,
            Entry::Message(msg) => {
                let body = msg.body.trim();
                let mut lines = if body.is_empty() {
                    0
                } else {
                    textwrap::wrap(body, wrap_options(inner)).len()
                };
                if let Some((name_line, info_line)) = attachment_lines(msg) {
                    if lines > 0 {
                        lines += 1; // blank separator between body and attachment
                    }
                    lines += textwrap::wrap(&name_line, wrap_options(inner)).len();
                    lines += textwrap::wrap(&info_line, wrap_options(inner)).len();
                }
                (lines as u16).max(1) + VERTICAL_OVERHEAD
            }
        }
    }
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);

        let (title, timestamp, style, content) = match self.entry {
            Entry::Loading { notice } => {
                let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
                let style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC);
                let line = Line::from(vec![
                    Span::raw(spinner.to_string()),
                    Span::raw(" "),
                    Span::raw(notice.clone()),
                ]);
                ("assistant", String::new(), style, vec![line])
            }
            Entry::Message(msg) => {
                let style = role_style(msg.role);
                let mut lines: Vec<Line> = Vec::new();

                let body = msg.body.trim();
                if !body.is_empty() && inner_width > 0 {
                    for wrapped in textwrap::wrap(body, wrap_options(inner_width)) {
                        lines.push(Line::raw(wrapped.into_owned()));
                    }
                }

                if let Some((name_line, info_line)) = attachment_lines(msg) {
                    if !lines.is_empty() {
                        lines.push(Line::raw(""));
                    }
                    let thumb_style = Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD);
                    if inner_width > 0 {
                        for wrapped in textwrap::wrap(&name_line, wrap_options(inner_width)) {
                            lines.push(Line::styled(wrapped.into_owned(), thumb_style));
                        }
                        for wrapped in textwrap::wrap(&info_line, wrap_options(inner_width)) {
                            lines.push(Line::styled(
                                wrapped.into_owned(),
                                Style::default().fg(Color::Magenta),
                            ));
                        }
                    }
                }

                (
                    role_title(msg.role),
                    msg.timestamp.clone(),
                    style,
                    lines,
                )
            }
        };

        // Selection gets a bright cyan border; everything else stays dim.
        let border_style = if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let mut block = Block::bordered()
            .title(title)
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if !timestamp.is_empty() {
            block = block.title_bottom(Line::from(timestamp).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(content).style(style).render(inner_area, buf);
    }
}
