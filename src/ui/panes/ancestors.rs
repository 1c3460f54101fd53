//! Ancestor pane: the chain of goroutines that led to the selected one

use super::utils::{clamp_scroll, frame_lines, pane_block, visible_height};
use crate::model::GoRoutine;
use crate::paths::PathMapper;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the ancestors pane
pub struct AncestorsRenderData<'a> {
    pub goroutine: Option<&'a GoRoutine>,
    /// Frames shown per ancestor; `None` shows all of them
    pub frame_limit: Option<usize>,
    pub filters: &'a [String],
    pub paths: &'a PathMapper,
}

/// Lines for every ancestor of `goroutine`, nearest first
pub(crate) fn ancestor_lines(
    data: &AncestorsRenderData,
    goroutine: &GoRoutine,
) -> Vec<Line<'static>> {
    let limit = data.frame_limit.unwrap_or(usize::MAX);
    let mut lines = Vec::new();
    for ancestor in goroutine.ancestors() {
        lines.push(Line::from(vec![
            Span::styled("➤ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                format!("{:<9}", ancestor.id),
                Style::default().fg(DEFAULT_THEME.goroutine_id),
            ),
        ]));
        for f in ancestor.stack.iter().take(limit) {
            lines.extend(frame_lines(f, 2, data.paths, data.filters));
        }
    }
    lines
}

/// Render the ancestors pane
pub fn render_ancestors_pane(
    frame: &mut Frame,
    area: Rect,
    data: AncestorsRenderData,
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

    let block = pane_block(format!(" ancestors of {} ", goroutine.id), is_focused);
    let lines = ancestor_lines(&data, goroutine);

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no ancestors recorded)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_height(area);
    clamp_scroll(scroll_offset, lines.len(), visible);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
