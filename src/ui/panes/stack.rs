//! Call-stack pane for the selected goroutine
//!
//! Each frame is shown as `package.function(args)` followed by its indented
//! source location, innermost frame first. Include-filter matches are
//! highlighted.

use super::utils::{clamp_scroll, frame_lines, goroutine_title, pane_block, visible_height};
use crate::model::GoRoutine;
use crate::paths::PathMapper;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the stack pane
pub struct StackRenderData<'a> {
    pub goroutine: Option<&'a GoRoutine>,
    pub filters: &'a [String],
    pub paths: &'a PathMapper,
}

/// Render the stack pane
pub fn render_stack_pane(
    frame: &mut Frame,
    area: Rect,
    data: StackRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let Some(goroutine) = data.goroutine else {
        frame.render_widget(
            Paragraph::new("").block(pane_block(String::new(), is_focused)),
            area,
        );
        *scroll_offset = 0;
        return;
    };

    let block = pane_block(goroutine_title(goroutine), is_focused);

    let all_items: Vec<ListItem> = goroutine
        .stack
        .iter()
        .flat_map(|f| frame_lines(f, 0, data.paths, data.filters))
        .map(ListItem::new)
        .collect();

    if all_items.is_empty() {
        let paragraph = Paragraph::new("(empty)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_height(area);
    clamp_scroll(scroll_offset, all_items.len(), visible);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
