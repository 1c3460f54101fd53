use crate::grouping::format_age;
use crate::model::{Frame as StackFrame, GoRoutine};
use crate::paths::PathMapper;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Style applied on top of a segment where a filter matches
pub(crate) fn match_style() -> Style {
    Style::default()
        .bg(DEFAULT_THEME.match_bg)
        .fg(ratatui::style::Color::Black)
}

/// Byte ranges of every occurrence of any needle, sorted and merged
pub(crate) fn match_ranges(text: &str, needles: &[String]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = needles
        .iter()
        .filter(|n| !n.is_empty())
        .flat_map(|n| text.match_indices(n.as_str()).map(|(i, m)| (i, i + m.len())))
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Turn styled segments into spans, highlighting filter matches even when
/// they cross segment boundaries
pub(crate) fn highlight_segments(
    segments: Vec<(String, Style)>,
    needles: &[String],
) -> Vec<Span<'static>> {
    let full: String = segments.iter().map(|(text, _)| text.as_str()).collect();
    let ranges = match_ranges(&full, needles);
    if ranges.is_empty() {
        return segments
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect();
    }

    let mut spans = Vec::new();
    let mut offset = 0;
    for (text, style) in segments {
        let start = offset;
        let end = offset + text.len();
        offset = end;

        let mut cursor = start;
        for &(m_start, m_end) in &ranges {
            if m_end <= cursor || m_start >= end {
                continue;
            }
            let s = m_start.max(cursor);
            let e = m_end.min(end);
            if s > cursor {
                spans.push(Span::styled(full[cursor..s].to_string(), style));
            }
            spans.push(Span::styled(full[s..e].to_string(), style.patch(match_style())));
            cursor = e;
        }
        if cursor < end {
            spans.push(Span::styled(full[cursor..end].to_string(), style));
        }
    }
    spans
}

/// `package.function(args)` followed by the indented `file:line`
pub(crate) fn frame_lines(
    frame: &StackFrame,
    indent: usize,
    paths: &PathMapper,
    needles: &[String],
) -> [Line<'static>; 2] {
    let pad = " ".repeat(indent);
    let mut segments = vec![(pad.clone(), Style::default())];
    if frame.created_by {
        segments.push((
            "created by ".to_string(),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    segments.push((frame.package.clone(), Style::default().fg(DEFAULT_THEME.package)));
    segments.push((".".to_string(), Style::default().fg(DEFAULT_THEME.comment)));
    segments.push((
        frame.function.clone(),
        Style::default()
            .fg(DEFAULT_THEME.function)
            .add_modifier(Modifier::BOLD),
    ));
    // spawn sites carry no argument list
    if !(frame.created_by && frame.arguments_raw.is_empty()) {
        segments.push((
            format!("({})", frame.arguments_raw),
            Style::default().fg(DEFAULT_THEME.fg),
        ));
    }

    let location = vec![
        (format!("{}    ", pad), Style::default()),
        (
            format!("{}:{}", paths.display(&frame.file), frame.line),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ];

    [
        Line::from(highlight_segments(segments, needles)),
        Line::from(highlight_segments(location, needles)),
    ]
}

/// ` goroutine N [status, age] `
pub(crate) fn goroutine_title(goroutine: &GoRoutine) -> String {
    match goroutine.age {
        Some(_) => format!(
            " goroutine {} [{}, {}] ",
            goroutine.id,
            goroutine.status,
            format_age(goroutine.age)
        ),
        None => format!(" goroutine {} [{}] ", goroutine.id, goroutine.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_match_ranges_merge() {
        let needles = vec!["ab".to_string(), "bc".to_string(), "x".to_string()];
        assert_eq!(match_ranges("abcdab", &needles), vec![(0, 3), (4, 6)]);
        assert!(match_ranges("abc", &[]).is_empty());
    }

    #[test]
    fn test_highlight_across_segments() {
        let segments = vec![
            ("main".to_string(), Style::default()),
            (".".to_string(), Style::default()),
            ("worker".to_string(), Style::default()),
        ];
        let spans = highlight_segments(segments, &["n.wo".to_string()]);
        assert_eq!(text(&spans), "main.worker");
        let highlighted: Vec<&str> = spans
            .iter()
            .filter(|s| s.style.bg == Some(DEFAULT_THEME.match_bg))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(highlighted, vec!["n", ".", "wo"]);
    }

    #[test]
    fn test_frame_lines() {
        let frame = StackFrame {
            package: "main".to_string(),
            function: "worker".to_string(),
            arguments_raw: "0x1234".to_string(),
            arguments: vec![0x1234],
            file: "/src/a.go".to_string(),
            line: 10,
            created_by: true,
        };
        let [signature, location] = frame_lines(&frame, 2, &PathMapper::default(), &[]);
        assert_eq!(text(&signature.spans), "  created by main.worker(0x1234)");
        assert_eq!(text(&location.spans), "      /src/a.go:10");
    }

    #[test]
    fn test_goroutine_title() {
        let mut g = GoRoutine::new(2, "chan receive");
        assert_eq!(goroutine_title(&g), " goroutine 2 [chan receive] ");
        g.age = Some(std::time::Duration::from_secs(300));
        assert_eq!(goroutine_title(&g), " goroutine 2 [chan receive, 5m] ");
    }
}
