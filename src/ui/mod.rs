//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, key and mouse event loop, pane focus
//! - **[`panes`]**: stateless render functions for each visible pane (timeline,
//!   call stack, ancestors, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a parsed
//! [`Trace`] and resolved [`Settings`] and call [`App::run`] to start the
//! event loop.
//!
//! [`Trace`]: crate::model::Trace
//! [`Settings`]: crate::config::Settings
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
