//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`timeline`]: the navigator's current list, groups or goroutines
//! - [`stack`]: call stack of the selected goroutine
//! - [`ancestors`]: the chain of goroutines that created the selected one
//! - [`status`]: status bar with keybindings and trace summary
//! - `utils`: shared frame formatting, match highlighting and scrolling
//!
//! Each pane module exports a `render_*_pane()` function taking a
//! `*RenderData` struct, so panes never reach into application state.

mod utils;

pub mod ancestors;
pub mod stack;
pub mod status;
pub mod timeline;

pub use ancestors::{render_ancestors_pane, AncestorsRenderData};
pub use stack::{render_stack_pane, StackRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use timeline::{render_timeline_pane, TimelineRenderData};
