//! Frame composition: lays out the title bar, conversation, preview strip,
//! and input box, then draws any open overlay on top. Also hosts the mouse
//! hit-testing that maps a screen row back to a conversation entry.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    AttachPrompt, FilePreview, MessageList, TitleBar, VideoModal,
};

/// Split the frame into the four stacked regions. The preview row collapses
/// to zero height when no video is staged; the input row grows with its
/// content.
fn layout_areas(area: Rect, has_preview: bool, input_height: u16) -> [Rect; 4] {
    use Constraint::{Length, Min};
    let preview_height = if has_preview { 1 } else { 0 };
    Layout::vertical([
        Length(1),
        Min(0),
        Length(preview_height),
        Length(input_height),
    ])
    .areas(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let [title_area, main_area, preview_area, input_area] = layout_areas(
        frame.area(),
        app.pending_video.is_some(),
        input_height,
    );

    TitleBar::new(app.connection, app.status_message.clone()).render(frame, title_area);

    MessageList::new(&mut tui.message_list, &app.conversation, spinner_frame)
        .render(frame, main_area);

    if let Some(video) = &app.pending_video {
        FilePreview::new(video).render(frame, preview_area);
    }

    tui.input_box.render(frame, input_area);

    // Overlays paint over everything else; the modal wins over the prompt.
    if let Some(prompt) = &tui.attach_prompt {
        AttachPrompt::new(prompt).render(frame, frame.area());
    }
    if let Some(modal) = &tui.video_modal {
        VideoModal::new(modal).render(frame, frame.area());
    }
}

/// Hit test: given a screen Y coordinate, find which entry index (if any) is
/// at that position. Mirrors `layout_areas` so hits stay aligned with what
/// was actually drawn.
pub fn hit_test_entry(
    screen_y: u16,
    frame_area: Rect,
    scroll_offset_y: u16,
    prefix_heights: &[u16],
    has_preview: bool,
    input_height: u16,
) -> Option<usize> {
    let [_title, main_area, _preview, _input] =
        layout_areas(frame_area, has_preview, input_height);

    if screen_y < main_area.y || screen_y >= main_area.y + main_area.height {
        return None;
    }

    // Convert screen Y to content Y (accounting for scroll)
    let content_y = (screen_y - main_area.y) + scroll_offset_y;

    // prefix_heights[i] is the content Y just past entry i
    let idx = prefix_heights.partition_point(|&end| end <= content_y);
    (idx < prefix_heights.len()).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, test_video};
    use crate::tui::TuiState;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw_to_text(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_empty_conversation() {
        let app = test_app();
        let mut tui = TuiState::new("mpv".to_string());
        let text = draw_to_text(&app, &mut tui);
        assert!(text.contains("PawChat"));
        assert!(text.contains("attach a video"));
    }

    #[test]
    fn test_draw_ui_with_entries_and_preview() {
        let mut app = test_app();
        app.conversation.push_user("is this normal?".to_string(), None);
        app.pending_video = Some(test_video());
        let mut tui = TuiState::new("mpv".to_string());

        let text = draw_to_text(&app, &mut tui);
        assert!(text.contains("is this normal?"));
        assert!(text.contains("clip.mp4"));
    }

    #[test]
    fn test_hit_test_maps_rows_to_entries() {
        let frame_area = Rect::new(0, 0, 80, 24);
        // Two entries of height 3 each; title bar occupies row 0
        let prefix_heights = vec![3, 6];

        // Row 1 is the first content row → entry 0
        assert_eq!(
            hit_test_entry(1, frame_area, 0, &prefix_heights, false, 3),
            Some(0)
        );
        // Row 4 → content y 3 → entry 1
        assert_eq!(
            hit_test_entry(4, frame_area, 0, &prefix_heights, false, 3),
            Some(1)
        );
        // Below all content → None
        assert_eq!(
            hit_test_entry(10, frame_area, 0, &prefix_heights, false, 3),
            None
        );
        // Title bar row → None
        assert_eq!(
            hit_test_entry(0, frame_area, 0, &prefix_heights, false, 3),
            None
        );
    }

    #[test]
    fn test_hit_test_accounts_for_scroll() {
        let frame_area = Rect::new(0, 0, 80, 24);
        let prefix_heights = vec![3, 6, 9];
        // Scrolled down 3 rows: the first visible row is entry 1
        assert_eq!(
            hit_test_entry(1, frame_area, 3, &prefix_heights, false, 3),
            Some(1)
        );
    }

    #[test]
    fn test_hit_test_input_area_is_dead_zone() {
        let frame_area = Rect::new(0, 0, 80, 24);
        let prefix_heights = vec![100]; // tall content
        // Input occupies the last 3 rows (21..24)
        assert_eq!(
            hit_test_entry(22, frame_area, 0, &prefix_heights, false, 3),
            None
        );
    }
}
