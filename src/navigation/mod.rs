//! Drill-down navigation over grouped goroutines
//!
//! [`Navigator`] is a two-level cursor: a list of groups ([`Depth::GroupList`])
//! and the goroutines of one group ([`Depth::ThreadList`]). It is driven by
//! discrete [`NavEvent`]s and reports every change of the selected goroutine
//! to a [`DetailListener`], which is the only way the rest of the application
//! learns about the selection.
//!
//! # Invariants
//!
//! - `group_index` always names an existing group when any group exists
//! - `thread_index` is `None` exactly when nothing is selected; at
//!   [`Depth::ThreadList`] it is `Some` unless the group is empty
//! - each selection change produces exactly one notification
//! - with [`GroupBy::None`] the cursor never leaves [`Depth::ThreadList`]

use crate::grouping::{self, Group, GroupBy};
use crate::model::{Frame, GoRoutine, Trace};
use std::time::Duration;

/// Receives the newly selected goroutine, or `None` when the selection clears
pub trait DetailListener<'a> {
    fn detail_changed(&mut self, goroutine: Option<&'a GoRoutine>);
}

impl<'a, F> DetailListener<'a> for F
where
    F: FnMut(Option<&'a GoRoutine>),
{
    fn detail_changed(&mut self, goroutine: Option<&'a GoRoutine>) {
        self(goroutine)
    }
}

/// Navigation level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    GroupList,
    ThreadList,
}

/// Input events understood by the navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Previous,
    Next,
    Activate,
    Leave,
    /// Mouse selection; carries the clicked row when it maps to one
    PointSelect(Option<usize>),
}

/// One display row of the current level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<'a> {
    Group {
        label: String,
        count: usize,
    },
    Thread {
        id: u64,
        status: &'a str,
        /// Only filled in when grouping is off
        age: Option<Duration>,
        package: &'a str,
        function: &'a str,
    },
}

/// The frame shown for a goroutine in list rows
///
/// With a focus package, the first frame (in stored order) whose package
/// contains it; otherwise, or when none matches, the innermost frame.
pub fn representative_frame<'g>(
    goroutine: &'g GoRoutine,
    focus: Option<&str>,
) -> Option<&'g Frame> {
    focus
        .filter(|pkg| !pkg.is_empty())
        .and_then(|pkg| goroutine.stack.iter().find(|f| f.package.contains(pkg)))
        .or_else(|| goroutine.first_frame())
}

/// Two-level cursor over the groups of one trace
pub struct Navigator<'a, L> {
    groups: Vec<Group<'a>>,
    group_by: GroupBy,
    focus_package: Option<String>,
    group_index: usize,
    thread_index: Option<usize>,
    depth: Depth,
    listener: L,
}

impl<'a, L: DetailListener<'a>> Navigator<'a, L> {
    /// Group `trace` by `group_by` and place the cursor at its initial state
    ///
    /// Without grouping the first goroutine is selected immediately and the
    /// listener is told about it.
    pub fn new(
        trace: &'a Trace,
        group_by: GroupBy,
        focus_package: Option<String>,
        listener: L,
    ) -> Self {
        let groups = grouping::group(&trace.goroutines, group_by);
        let mut navigator = Navigator {
            groups,
            group_by,
            focus_package,
            group_index: 0,
            thread_index: None,
            depth: Depth::GroupList,
            listener,
        };
        if !group_by.is_active() {
            navigator.depth = Depth::ThreadList;
            if navigator.current_group().is_some_and(|g| !g.is_empty()) {
                navigator.thread_index = Some(0);
                navigator.emit();
            }
        }
        log::debug!(
            "navigator ready: {} groups, grouping {:?}",
            navigator.groups.len(),
            group_by
        );
        navigator
    }

    /// Dispatch one input event
    pub fn handle(&mut self, event: NavEvent) {
        log::trace!("nav event {:?} at {:?}", event, self.depth);
        match event {
            NavEvent::Previous => self.move_previous(),
            NavEvent::Next => self.move_next(),
            NavEvent::Activate => self.activate(),
            NavEvent::Leave => self.leave(),
            NavEvent::PointSelect(row) => self.point_select(row),
        }
    }

    pub fn move_previous(&mut self) {
        match self.depth {
            Depth::GroupList => {
                if self.group_index > 0 {
                    self.group_index -= 1;
                }
            }
            Depth::ThreadList => {
                if let Some(index) = self.thread_index.filter(|&i| i > 0) {
                    self.select_thread(index - 1);
                }
            }
        }
    }

    pub fn move_next(&mut self) {
        match self.depth {
            Depth::GroupList => {
                if self.group_index + 1 < self.groups.len() {
                    self.group_index += 1;
                }
            }
            Depth::ThreadList => {
                let last = self.current_group().map_or(0, |g| g.len().saturating_sub(1));
                if let Some(index) = self.thread_index.filter(|&i| i < last) {
                    self.select_thread(index + 1);
                }
            }
        }
    }

    /// Enter the highlighted group and select its first goroutine
    pub fn activate(&mut self) {
        if self.depth != Depth::GroupList || self.groups.is_empty() {
            return;
        }
        self.enter_group();
    }

    /// Return to the group list, clearing the selection
    pub fn leave(&mut self) {
        if self.depth != Depth::ThreadList || !self.group_by.is_active() {
            return;
        }
        self.depth = Depth::GroupList;
        self.thread_index = None;
        log::debug!("left group {}", self.group_index);
        self.listener.detail_changed(None);
    }

    /// Mouse selection of `row` in the current list
    pub fn point_select(&mut self, row: Option<usize>) {
        match self.depth {
            Depth::GroupList => {
                if let Some(row) = row.filter(|&r| r < self.groups.len()) {
                    self.group_index = row;
                }
                if !self.groups.is_empty() {
                    self.enter_group();
                }
            }
            Depth::ThreadList => {
                let len = self.current_group().map_or(0, Group::len);
                match row.filter(|&r| r < len) {
                    Some(row) if self.thread_index != Some(row) => self.select_thread(row),
                    Some(_) => {}
                    None => {
                        if self.thread_index.is_none() && len > 0 {
                            self.select_thread(0);
                        }
                    }
                }
            }
        }
    }

    // ===== Accessors =====

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    pub fn thread_index(&self) -> Option<usize> {
        self.thread_index
    }

    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    pub fn groups(&self) -> &[Group<'a>] {
        &self.groups
    }

    pub fn current_group(&self) -> Option<&Group<'a>> {
        self.groups.get(self.group_index)
    }

    pub fn selected(&self) -> Option<&'a GoRoutine> {
        let index = self.thread_index?;
        self.current_group()?.get(index)
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Rows of the current level, in display order
    pub fn rows(&self) -> Vec<Row<'a>> {
        match self.depth {
            Depth::GroupList => self
                .groups
                .iter()
                .map(|g| Row::Group {
                    label: g.label(),
                    count: g.len(),
                })
                .collect(),
            Depth::ThreadList => {
                let Some(group) = self.current_group() else {
                    return Vec::new();
                };
                let focus = self.focus_package.as_deref();
                let show_age = !self.group_by.is_active();
                group
                    .members
                    .iter()
                    .map(|&g| {
                        let frame = representative_frame(g, focus);
                        Row::Thread {
                            id: g.id,
                            status: g.status.as_str(),
                            age: if show_age { g.age } else { None },
                            package: frame.map_or("", |f| f.package_base()),
                            function: frame.map_or("", |f| f.function.as_str()),
                        }
                    })
                    .collect()
            }
        }
    }

    /// Index into [`rows`](Self::rows) of the highlighted row
    pub fn highlighted_row(&self) -> Option<usize> {
        match self.depth {
            Depth::GroupList => (!self.groups.is_empty()).then_some(self.group_index),
            Depth::ThreadList => self.thread_index,
        }
    }

    // ===== Transitions =====

    fn enter_group(&mut self) {
        self.depth = Depth::ThreadList;
        if self.thread_index.is_none() && self.current_group().is_some_and(|g| !g.is_empty()) {
            log::debug!("entered group {}", self.group_index);
            self.select_thread(0);
        }
    }

    fn select_thread(&mut self, index: usize) {
        self.thread_index = Some(index);
        self.emit();
    }

    fn emit(&mut self) {
        let selected = self.selected();
        self.listener.detail_changed(selected);
    }
}
