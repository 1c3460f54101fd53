//! Main TUI application state and logic

use crate::config::Settings;
use crate::grouping::GroupBy;
use crate::model::{GoRoutine, Trace};
use crate::navigation::{Depth, DetailListener, NavEvent, Navigator};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Timeline,
    Stack,
    Ancestors,
}

impl FocusedPane {
    /// Move focus to the next pane (timeline -> stack -> ancestors)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Timeline => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Ancestors,
            FocusedPane::Ancestors => FocusedPane::Timeline,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Timeline => FocusedPane::Ancestors,
            FocusedPane::Stack => FocusedPane::Timeline,
            FocusedPane::Ancestors => FocusedPane::Stack,
        }
    }
}

/// State of the two detail panes, updated through the navigator's listener
#[derive(Debug, Default)]
pub struct DetailPanes<'a> {
    pub selected: Option<&'a GoRoutine>,
    pub stack_scroll: usize,
    pub ancestors_scroll: usize,
}

impl<'a> DetailListener<'a> for DetailPanes<'a> {
    fn detail_changed(&mut self, goroutine: Option<&'a GoRoutine>) {
        self.selected = goroutine;
        self.stack_scroll = 0;
        self.ancestors_scroll = 0;
    }
}

/// The main application state
pub struct App<'a> {
    pub navigator: Navigator<'a, DetailPanes<'a>>,

    trace: &'a Trace,
    settings: Settings,

    /// Shown in the status bar on startup
    source_name: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    pub timeline_scroll: usize,

    /// Pane areas from the last render, for mouse hit testing
    timeline_area: Rect,
    stack_area: Rect,
    ancestors_area: Rect,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl<'a> App<'a> {
    pub fn new(trace: &'a Trace, settings: Settings, source_name: impl Into<String>) -> Self {
        let navigator = Navigator::new(
            trace,
            settings.group_by,
            settings.focus_package.clone(),
            DetailPanes::default(),
        );
        let source_name = source_name.into();
        App {
            navigator,
            trace,
            settings,
            status_message: source_name.clone(),
            source_name,
            focused_pane: FocusedPane::Timeline,
            timeline_scroll: 0,
            timeline_area: Rect::default(),
            stack_area: Rect::default(),
            ancestors_area: Rect::default(),
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key_event(key)
                    }
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Timeline on the left, details on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(pane_area);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        self.timeline_area = columns[0];
        self.stack_area = right_rows[0];
        self.ancestors_area = right_rows[1];

        let rows = self.navigator.rows();
        let title = format!(" {} ", self.timeline_title());
        super::panes::render_timeline_pane(
            frame,
            self.timeline_area,
            super::panes::TimelineRenderData {
                title,
                rows: &rows,
                highlighted: self.navigator.highlighted_row(),
            },
            self.focused_pane == FocusedPane::Timeline,
            &mut self.timeline_scroll,
        );

        let filters = self.trace.filters.include();
        let details = self.navigator.listener_mut();
        super::panes::render_stack_pane(
            frame,
            self.stack_area,
            super::panes::StackRenderData {
                goroutine: details.selected,
                filters,
                paths: &self.settings.paths,
            },
            self.focused_pane == FocusedPane::Stack,
            &mut details.stack_scroll,
        );

        super::panes::render_ancestors_pane(
            frame,
            self.ancestors_area,
            super::panes::AncestorsRenderData {
                goroutine: details.selected,
                frame_limit: self.settings.ancestor_frames,
                filters,
                paths: &self.settings.paths,
            },
            self.focused_pane == FocusedPane::Ancestors,
            &mut details.ancestors_scroll,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            super::panes::StatusRenderData {
                message: &self.status_message,
                goroutines: self.trace.len(),
                filtered_out: self.trace.filtered_out,
                depth: self.navigator.depth(),
                grouped: self.navigator.group_by().is_active(),
            },
        );
    }

    /// Group mode at the group level, the open group's label inside one
    fn timeline_title(&self) -> String {
        if self.navigator.depth() == Depth::ThreadList {
            if let Some(group) = self.navigator.current_group() {
                if self.navigator.group_by().is_active() {
                    return group.label();
                }
            }
        }
        match self.navigator.group_by() {
            GroupBy::None => "goroutines".to_string(),
            GroupBy::Age => "groups by age".to_string(),
            GroupBy::Stack => "groups by stack".to_string(),
            GroupBy::Status => "groups by status".to_string(),
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll_or_move(true),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_or_move(false),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
                self.navigate(NavEvent::Activate);
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => {
                self.navigate(NavEvent::Leave);
            }
            _ => {}
        }
    }

    /// Handle mouse events: left click point-selects in the timeline, the
    /// wheel scrolls the focused pane
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(self.timeline_area, mouse.column, mouse.row) {
                    self.focused_pane = FocusedPane::Timeline;
                    let row = self.timeline_row_at(mouse.row);
                    self.navigate(NavEvent::PointSelect(row));
                } else if contains(self.stack_area, mouse.column, mouse.row) {
                    self.focused_pane = FocusedPane::Stack;
                } else if contains(self.ancestors_area, mouse.column, mouse.row) {
                    self.focused_pane = FocusedPane::Ancestors;
                }
            }
            MouseEventKind::ScrollUp => self.scroll_or_move(true),
            MouseEventKind::ScrollDown => self.scroll_or_move(false),
            _ => {}
        }
    }

    /// List row under terminal row `y`, skipping the pane border
    fn timeline_row_at(&self, y: u16) -> Option<usize> {
        let area = self.timeline_area;
        let top = area.y + 1;
        let bottom = area.y + area.height.saturating_sub(1);
        (y >= top && y < bottom).then(|| (y - top) as usize + self.timeline_scroll)
    }

    fn scroll_or_move(&mut self, up: bool) {
        match self.focused_pane {
            FocusedPane::Timeline => {
                self.navigate(if up { NavEvent::Previous } else { NavEvent::Next });
            }
            FocusedPane::Stack => scroll(&mut self.navigator.listener_mut().stack_scroll, up),
            FocusedPane::Ancestors => {
                scroll(&mut self.navigator.listener_mut().ancestors_scroll, up)
            }
        }
    }

    fn navigate(&mut self, event: NavEvent) {
        self.navigator.handle(event);
        self.status_message = match self.navigator.selected() {
            Some(g) => format!("goroutine {}", g.id),
            None => self.source_name.clone(),
        };
    }
}

fn scroll(offset: &mut usize, up: bool) {
    *offset = if up {
        offset.saturating_sub(1)
    } else {
        offset.saturating_add(1)
    };
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}
