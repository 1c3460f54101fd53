//! Timeline pane: the group list or the goroutine list of one group
//!
//! Renders the navigator's [`Row`]s one per line with the cursor row
//! highlighted, and scrolls so the cursor row always stays visible.

use super::utils::{clamp_scroll, pane_block, scroll_to_row, visible_height};
use crate::grouping::format_age;
use crate::navigation::Row;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Data needed to render the timeline pane
pub struct TimelineRenderData<'a> {
    pub title: String,
    pub rows: &'a [Row<'a>],
    pub highlighted: Option<usize>,
}

fn row_line(row: &Row<'_>) -> Line<'static> {
    match row {
        Row::Group { label, count } => Line::from(vec![
            Span::styled("➤ ", Style::default().fg(DEFAULT_THEME.secondary)),
            Span::styled(
                label.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.age)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", count),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]),
        Row::Thread {
            id,
            status,
            age,
            package,
            function,
        } => {
            let mut spans = vec![
                Span::styled("➤ ", Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{:<9}", id),
                    Style::default().fg(DEFAULT_THEME.goroutine_id),
                ),
                Span::raw(" "),
                Span::styled(
                    status.to_string(),
                    Style::default()
                        .fg(DEFAULT_THEME.fg)
                        .add_modifier(Modifier::BOLD),
                ),
            ];
            if age.is_some() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format_age(*age),
                    Style::default().fg(DEFAULT_THEME.age),
                ));
            }
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                package.to_string(),
                Style::default().fg(DEFAULT_THEME.package),
            ));
            spans.push(Span::styled(".", Style::default().fg(DEFAULT_THEME.comment)));
            spans.push(Span::styled(
                function.to_string(),
                Style::default().fg(DEFAULT_THEME.function),
            ));
            Line::from(spans)
        }
    }
}

/// Render the timeline pane
pub fn render_timeline_pane(
    frame: &mut Frame,
    area: Rect,
    data: TimelineRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(data.title, is_focused);

    if data.rows.is_empty() {
        let paragraph = Paragraph::new("(no goroutines)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible = visible_height(area);
    if let Some(row) = data.highlighted {
        scroll_to_row(scroll_offset, row, visible);
    }
    clamp_scroll(scroll_offset, data.rows.len(), visible);

    let items: Vec<ListItem> = data
        .rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(index, row)| {
            let item = ListItem::new(row_line(row));
            if data.highlighted == Some(index) {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
