//! # MessageList Component
//!
//! Scrollable view of the conversation log.
//!
//! ## Responsibilities
//!
//! - Display the ordered entries (messages + loading placeholder)
//! - Stick-to-bottom auto-scroll on new content
//! - Hit testing support for mouse interactions
//! - Layout caching (entry heights), invalidated by conversation revision
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Conversation`
//! (props). Since `Component::render` takes `&mut self`, the layout cache
//! and scroll state can be updated during the render pass, aligning with
//! Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::Conversation;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Currently selected entry index (hover or keyboard navigation)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            selected_index: None,
            viewport_height: 0,
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    /// Prevents overscrolling past the last entry.
    pub fn clamp_scroll(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Scroll the viewport so the selected entry is fully visible.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.layout.prefix_heights.len() {
            return;
        }

        let item_top = if idx == 0 {
            0
        } else {
            self.layout.prefix_heights[idx - 1]
        };
        let item_bottom = self.layout.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            // Selected entry is above viewport — scroll up to show its top
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            // Selected entry is below viewport — scroll down to show its bottom
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            // Re-pin if we've landed at the absolute bottom
            let total: u16 = self.layout.heights.iter().sum();
            let max_y = total.saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the
    /// bottom. Called on scroll-down events so that scrolling past the end
    /// re-pins to bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let total_content_height: u16 = self.layout.heights.iter().sum();
        let max_y = total_content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    // Mutable reference to persistent state
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        conversation: &'a Conversation,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            conversation,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.conversation.is_empty() {
            draw_empty_hint(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Refresh the layout cache (no-op unless the log or width changed)
        self.state.layout.rebuild(self.conversation, content_width);

        let total_height: u16 = self.state.layout.heights.iter().sum();

        // 2. Clamp scroll offset to prevent overscrolling past content.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible entries into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let entry = &self.conversation.entries[i];
            let height = self.state.layout.heights[i];
            let is_selected = self.state.selected_index == Some(i);

            let entry_rect = Rect::new(0, y_offset, content_width, height);
            let view = MessageView::new(entry, is_selected, self.spinner_frame);
            scroll_view.render_widget(view, entry_rect);

            y_offset += height;
        }

        // Auto-scroll: newest entry visible after every insertion
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Shown while the conversation is still empty.
fn draw_empty_hint(frame: &mut Frame, area: Rect) {
    let hint = Paragraph::new(vec![
        ratatui::text::Line::raw("PawChat"),
        ratatui::text::Line::raw(""),
        ratatui::text::Line::raw("Ask about your pet's behavior, or attach a video with Ctrl+U."),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);

    // Nudge toward vertical center without a full layout pass
    let y = area.y + area.height.saturating_sub(3) / 2;
    let centered = Rect::new(area.x, y, area.width, 3.min(area.height));
    frame.render_widget(hint, centered);
}

/// EventHandler is implemented on `MessageListState` rather than `MessageList`
/// because event handling requires persistent state (scroll position,
/// stick_to_bottom flag), and `MessageList` is recreated each frame.
impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Cached layout measurements.
///
/// Entries are immutable once appended, so the whole cache stays valid until
/// the conversation's revision counter or the content width changes. The
/// revision also covers the loading placeholder being swapped for the final
/// reply between frames.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    cached_revision: Option<u64>,
    cached_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            cached_revision: None,
            cached_width: 0,
        }
    }

    /// Recompute heights if the conversation or width changed since the last
    /// frame; otherwise keep the cache.
    pub fn rebuild(&mut self, conversation: &Conversation, content_width: u16) {
        if self.cached_revision == Some(conversation.revision)
            && self.cached_width == content_width
        {
            return;
        }

        self.heights = conversation
            .entries
            .iter()
            .map(|entry| MessageView::calculate_height(entry, content_width))
            .collect();
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
        self.cached_revision = Some(conversation.revision);
        self.cached_width = content_width;
    }

    /// The range of entry indices that intersect the viewport, with half a
    /// viewport of buffer on each side.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation_with(n: usize) -> Conversation {
        let mut log = Conversation::new();
        for i in 0..n {
            log.push_user(format!("message {i}"), None);
        }
        log
    }

    #[test]
    fn rebuild_populates_heights_and_prefixes() {
        let log = conversation_with(3);
        let mut cache = LayoutCache::new();
        cache.rebuild(&log, 80);

        assert_eq!(cache.heights.len(), 3);
        // Single-line entries: 1 content + 2 borders = 3 each
        assert_eq!(cache.heights, vec![3, 3, 3]);
        assert_eq!(cache.prefix_heights, vec![3, 6, 9]);
    }

    #[test]
    fn rebuild_is_cached_until_revision_changes() {
        let mut log = conversation_with(2);
        let mut cache = LayoutCache::new();
        cache.rebuild(&log, 80);
        let before = cache.prefix_heights.clone();

        // Same revision + width → untouched
        cache.rebuild(&log, 80);
        assert_eq!(cache.prefix_heights, before);

        // New entry bumps the revision → recompute
        log.push_assistant("reply".to_string(), None);
        cache.rebuild(&log, 80);
        assert_eq!(cache.heights.len(), 3);
    }

    #[test]
    fn rebuild_invalidates_on_width_change() {
        let log = conversation_with(1);
        let mut cache = LayoutCache::new();
        cache.rebuild(&log, 80);
        let wide = cache.heights[0];

        cache.rebuild(&log, 10);
        assert!(cache.heights[0] >= wide, "narrower width wraps to more lines");
    }

    #[test]
    fn rebuild_tracks_placeholder_swap() {
        // The Loading → reply swap keeps the entry count stable but changes
        // content; the revision counter must catch it.
        let mut log = conversation_with(1);
        log.begin_loading("Thinking…");
        let mut cache = LayoutCache::new();
        cache.rebuild(&log, 80);
        assert_eq!(cache.heights.len(), 2);

        log.end_loading();
        log.push_assistant("a much longer reply\nspanning\nthree lines".to_string(), None);
        cache.rebuild(&log, 80);
        assert_eq!(cache.heights.len(), 2);
        assert_eq!(cache.heights[1], 5); // 3 content lines + borders
    }

    #[test]
    fn visible_range_windows_the_log() {
        let log = conversation_with(50);
        let mut cache = LayoutCache::new();
        cache.rebuild(&log, 80);

        // Viewport at the top only needs the first few entries
        let top = cache.visible_range(0, 12);
        assert_eq!(top.start, 0);
        assert!(top.end < 50);

        // Deep scroll skips the leading entries
        let deep = cache.visible_range(100, 12);
        assert!(deep.start > 0);
    }

    #[test]
    fn scroll_events_detach_and_repin() {
        let mut state = MessageListState::new();
        state.viewport_height = 10;
        state.layout.heights = vec![3; 10];

        assert!(state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
    }
}
