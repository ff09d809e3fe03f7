//! # InputBox Component
//!
//! Multi-line draft editor for the outgoing message.
//!
//! ## Responsibilities
//!
//! - Capture text input (insert, backspace, delete, cursor movement, paste)
//! - Grow with content up to a visible-line cap, then scroll internally
//! - Signal submission (Enter) without consuming the draft — the parent
//!   checks the send guard first and calls [`InputBox::take_text`] only when
//!   the send is actually going out, so a blocked submit never loses the draft
//!
//! The buffer and cursor are internal state; everything else arrives as props.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to content (border width)
const BORDER_OFFSET: u16 = 2;

const PLACEHOLDER: &str = "Ask about your pet's behavior…";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User pressed Enter. The draft stays in the buffer until the parent
    /// takes it.
    SubmitRequested,
    /// Text content changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (internal state)
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// Line offset for internal scrolling (0 when content fits)
    scroll_offset: u16,
}

fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Count wrapped lines, accounting for trailing newlines that textwrap
/// does not represent as empty lines.
fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    let lines = textwrap::wrap(text, wrap_options(width));
    let mut count = (lines.len() as u16).max(1);
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        count += 1;
    }
    count
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll_offset: 0,
        }
    }

    /// The current draft, untouched.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Take the draft out of the buffer, resetting the editor.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        self.scroll_offset = 0;
        std::mem::take(&mut self.buffer)
    }

    /// Calculate required height for the current buffer, clamped to the
    /// visible-line cap. The box grows with the draft like the original
    /// auto-sizing text area.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        let width = content_width.saturating_sub(HORIZONTAL_OVERHEAD);
        let content_lines = wrap_line_count(&self.buffer, width);
        content_lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Which wrapped line (0-based) the cursor is on.
    fn cursor_line(&self, width: u16) -> u16 {
        if width == 0 {
            return 0;
        }
        let before = &self.buffer[..self.cursor];
        let lines = textwrap::wrap(before, wrap_options(width));
        let mut line = lines.len().saturating_sub(1) as u16;
        // A cursor sitting right after a newline lands on the next (empty)
        // line, which textwrap does not emit.
        if self.cursor > 0
            && self.buffer.as_bytes()[self.cursor - 1] == b'\n'
            && !lines.last().is_some_and(|l| l.is_empty())
        {
            line += 1;
        }
        line
    }

    /// Keep the cursor inside the visible window.
    fn update_scroll_offset(&mut self, content_width: u16) {
        let width = content_width.saturating_sub(HORIZONTAL_OVERHEAD);
        let total = wrap_line_count(&self.buffer, width);
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let line = self.cursor_line(width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line.saturating_sub(MAX_VISIBLE_LINES - 1);
        }
    }

    /// The lines shown at the current scroll offset.
    fn visible_text(&self, content_width: u16) -> String {
        if self.scroll_offset == 0 {
            return self.buffer.clone();
        }
        let width = content_width.saturating_sub(HORIZONTAL_OVERHEAD);
        if width == 0 {
            return String::new();
        }
        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = self.scroll_offset as usize;
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start..end].join("\n")
    }

    /// Screen position of the cursor within the rendered area.
    fn cursor_screen_pos(&self, area: Rect) -> (u16, u16) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        if width == 0 {
            return (area.x + BORDER_OFFSET, area.y + 1);
        }

        let line = self.cursor_line(width);

        // Column counts chars from the last hard or soft break. textwrap
        // trims trailing whitespace, so count from the raw logical line.
        let before = &self.buffer[..self.cursor];
        let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let wrapped = textwrap::wrap(logical, wrap_options(width));
        let col = if wrapped.is_empty() {
            0
        } else {
            let prev: usize = wrapped
                .iter()
                .take(wrapped.len() - 1)
                .map(|seg| seg.chars().count())
                .sum();
            (logical.chars().count() - prev) as u16
        };

        let visible_line = line.saturating_sub(self.scroll_offset);
        (area.x + BORDER_OFFSET + col, area.y + 1 + visible_line)
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.update_scroll_offset(area.width);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .padding(ratatui::widgets::Padding::horizontal(1))
            .title("Message");

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.visible_text(area.width))
                .style(Style::default().fg(Color::Green))
        };

        frame.render_widget(paragraph.block(block), area);

        let (cursor_x, cursor_y) = self.cursor_screen_pos(area);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(self.cursor, text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != line_start).then(|| {
                    self.cursor = line_start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != line_end).then(|| {
                    self.cursor = line_end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => Some(InputEvent::SubmitRequested),
            _ => None,
        }
    }
}
