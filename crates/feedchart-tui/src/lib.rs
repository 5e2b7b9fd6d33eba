//! Terminal UI for feedchart.
//!
//! Draws the live category chart with Ratatui and keeps it current from the
//! feed listener's events.
//!
//! ## Hotkeys
//!
//! - `?` or `h` - Help
//! - `r` or `Ctrl+L` - Redraw
//! - `q` or `Esc` - Quit
//! - `Ctrl+C` - Force quit
//!
//! Without a terminal, [`headless::run_headless`] applies the same events to
//! a [`SnapshotSink`] and reports each change through tracing.

pub mod app;
pub mod event;
pub mod headless;
pub mod sink;
pub mod theme;

pub use app::{App, AppResult};
pub use headless::run_headless;
pub use sink::{BarChartSink, SnapshotSink};
